//! Domain models for the storefront.
//!
//! Session-scoped records (`Cart`, `OrderInfo`) live in `bazaar-core`;
//! this module holds the persistent product row and session keys.

pub mod product;
pub mod session;

pub use product::{NewProduct, Product, parse_price};
pub use session::keys as session_keys;
