//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Session cart loading/saving and product snapshots
//! - `flash` - One-shot notifications carried to the next rendered page
//! - `uploads` - Product image validation, storage and cleanup

pub mod cart;
pub mod flash;
pub mod uploads;

pub use cart::{AddOutcome, CartService};
pub use flash::{FlashLevel, FlashMessage};
pub use uploads::{ImageUploads, UploadError, UploadedImage};
