//! Core types for Bazaar.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;

pub use cart::{Cart, CartItem, compute_total};
pub use id::ProductId;
pub use order::{CheckoutDetails, OrderInfo};
pub use price::{decimal_to_amount, format_amount, format_decimal};
