//! Session-related types.

/// Session keys for storefront state.
pub mod keys {
    /// Key for the shopper's cart (`bazaar_core::Cart`).
    pub const CART: &str = "cart";

    /// Key for the last captured order (`bazaar_core::OrderInfo`).
    pub const ORDER_INFO: &str = "order_info";

    /// Key for pending flash messages.
    pub const FLASH: &str = "_flash";
}
