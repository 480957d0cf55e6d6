//! Checkout route handlers.
//!
//! Checkout only records what the shopper typed; no payment is taken and
//! nothing is persisted to the product store. The captured order lives in
//! the session until the confirmation page shows it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use bazaar_core::{CheckoutDetails, OrderInfo, format_amount};

use crate::error::Result;
use crate::models::session_keys;
use crate::routes::cart::CartItemView;
use crate::services::cart::{load_cart, save_cart};
use crate::services::{FlashLevel, FlashMessage, flash};

const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Confirmation page data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub total: String,
    pub items: Vec<CartItemView>,
    pub submitted_at: String,
}

impl From<&OrderInfo> for OrderView {
    fn from(order: &OrderInfo) -> Self {
        Self {
            name: order.name.clone(),
            email: order.email.clone(),
            address: order.address.clone(),
            phone: order.phone.clone(),
            payment_method: order.payment_method.clone(),
            total: format_amount(order.total),
            items: order.items.iter().map(CartItemView::from).collect(),
            submitted_at: order.submitted_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub total: String,
    pub item_count: usize,
    pub flashes: Vec<FlashMessage>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order: OrderView,
    pub flashes: Vec<FlashMessage>,
}

/// Display the checkout form.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        flash::push(&session, FlashLevel::Info, EMPTY_CART_MESSAGE).await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutTemplate {
        total: format_amount(cart.total()),
        item_count: cart.len(),
        flashes: flash::take(&session).await?,
    }
    .into_response())
}

/// Capture the submitted details and the cart into an order.
///
/// The cart is cleared once the order is stored.
#[instrument(skip(session, details))]
pub async fn submit(session: Session, Form(details): Form<CheckoutDetails>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;

    let Some(order) = OrderInfo::capture(details, &cart, Utc::now()) else {
        flash::push(&session, FlashLevel::Info, EMPTY_CART_MESSAGE).await?;
        return Ok(Redirect::to("/cart"));
    };

    session.insert(session_keys::ORDER_INFO, &order).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(
        item_count = order.item_count(),
        total = order.total,
        "Order captured"
    );
    Ok(Redirect::to("/order_confirmation"))
}

/// Display the captured order.
#[instrument(skip(session))]
pub async fn confirmation(session: Session) -> Result<Response> {
    let Some(order) = session.get::<OrderInfo>(session_keys::ORDER_INFO).await? else {
        flash::push(&session, FlashLevel::Error, "No order information found.").await?;
        return Ok(Redirect::to("/checkout").into_response());
    };

    Ok(ConfirmationTemplate {
        order: OrderView::from(&order),
        flashes: flash::take(&session).await?,
    }
    .into_response())
}
