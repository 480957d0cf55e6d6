//! Cart route handlers.
//!
//! The cart is a list of product snapshots kept in the session. Every
//! mutation loads it, changes it and saves it back before redirecting.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;

use bazaar_core::{Cart, CartItem, format_amount};

use crate::error::{Result, add_breadcrumb};
use crate::routes::{ProductIdPath, image_src};
use crate::services::cart::{load_cart, save_cart};
use crate::services::{AddOutcome, CartService, FlashLevel, FlashMessage, flash};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image_src: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            price: format_amount(item.price),
            image_src: image_src(&item.image_url),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: format_amount(cart.total()),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub flashes: Vec<FlashMessage>,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        flashes: flash::take(&session).await?,
    })
}

/// Add a product to the cart.
///
/// Unknown ids leave the cart alone and send the shopper back to the catalog.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ProductIdPath(id): ProductIdPath,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;

    match CartService::new(state.products()).add_item(&mut cart, id).await? {
        AddOutcome::Added(item) => {
            save_cart(&session, &cart).await?;
            let product_id = id.to_string();
            add_breadcrumb(
                "cart",
                "Added product",
                Some(&[("product_id", product_id.as_str())][..]),
            );
            tracing::info!(product_id = %item.id, cart_len = cart.len(), "Added to cart");
            flash::push(&session, FlashLevel::Success, "Added to cart.").await?;
            Ok(Redirect::to("/cart"))
        }
        AddOutcome::NotFound => {
            flash::push(&session, FlashLevel::Error, "Product not found.").await?;
            Ok(Redirect::to("/products"))
        }
    }
}

/// Remove the first cart item with this product id.
#[instrument(skip(session))]
pub async fn remove(session: Session, ProductIdPath(id): ProductIdPath) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;

    let message = if cart.remove_first(id) {
        save_cart(&session, &cart).await?;
        "Removed from cart."
    } else {
        "Item not found in cart."
    };

    flash::push(&session, FlashLevel::Info, message).await?;
    Ok(Redirect::to("/cart"))
}
