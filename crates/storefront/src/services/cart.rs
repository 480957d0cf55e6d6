//! Cart service.
//!
//! The cart lives in the session. Handlers load it into an owned [`Cart`],
//! mutate it through `&mut Cart`, and save it back. Two concurrent requests
//! from the same session can interleave this read-modify-write; the last
//! save wins.

use tower_sessions::Session;
use tracing::instrument;

use bazaar_core::{Cart, CartItem, ProductId};

use crate::db::{ProductStore, RepositoryError};
use crate::models::session_keys;

/// Result of adding a product to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The snapshot that was appended.
    Added(CartItem),
    /// No product with that id; the cart was not touched.
    NotFound,
}

/// Cart operations that need the product store.
pub struct CartService<'a> {
    products: &'a dyn ProductStore,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductStore) -> Self {
        Self { products }
    }

    /// Look up a product and append a snapshot of it to the cart.
    ///
    /// The item is appended even if the product is already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the product lookup fails.
    #[instrument(skip(self, cart), fields(cart_len = cart.len()))]
    pub async fn add_item(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
    ) -> Result<AddOutcome, RepositoryError> {
        let Some(product) = self.products.get_product(product_id).await? else {
            return Ok(AddOutcome::NotFound);
        };

        let item = product.to_cart_item();
        cart.push(item.clone());
        Ok(AddOutcome::Added(item))
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session. A session without a cart has an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value is invalid.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the cart to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}
