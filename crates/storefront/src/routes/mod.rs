//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (product store ping)
//! GET  /static/*                  - CSS and uploaded images
//!
//! # Catalog
//! GET  /products                  - Product listing
//!
//! # Cart
//! GET  /cart                      - Cart page with total
//! GET  /add_to_cart/{id}          - Append a product snapshot, redirect to cart
//! GET  /remove_from_cart/{id}     - Remove the first matching item, redirect to cart
//!
//! # Checkout
//! GET  /checkout                  - Checkout form (redirects to cart when empty)
//! POST /checkout                  - Capture order details, redirect to confirmation
//! GET  /order_confirmation        - Show the captured order
//!
//! # Admin (no authentication)
//! GET  /admin/products            - Product table
//! GET  /admin/add_product         - New product form
//! POST /admin/add_product         - Create product (multipart, image upload)
//! GET  /admin/delete_product/{id} - Delete product
//! POST /admin/delete_product/{id} - Delete product
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequestParts, Path},
    http::request::Parts,
    routing::get,
};

use bazaar_core::{ProductId, format_decimal};

use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;

/// Product id taken from the `{id}` path segment.
///
/// Only non-negative integers that fit a `SERIAL` match; anything else is
/// a 404, the same as an unknown route.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<u32>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let id = i32::try_from(raw).map_err(|_| AppError::NotFound)?;
        Ok(Self(ProductId::new(id)))
    }
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    /// Public URL of the image, or empty.
    pub image_src: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_decimal(product.price),
            image_src: image_src(&product.image_url),
        }
    }
}

/// Public URL for a stored image path.
pub(crate) fn image_src(image_url: &str) -> String {
    if image_url.is_empty() {
        String::new()
    } else {
        format!("/static/{image_url}")
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add_to_cart/{id}", get(cart::add))
        .route("/remove_from_cart/{id}", get(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/order_confirmation", get(checkout::confirmation))
}

/// Create the admin routes router.
///
/// Uploads on `/add_product` are capped at `max_upload_bytes`.
pub fn admin_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::products))
        .route(
            "/add_product",
            get(admin::new_product)
                .post(admin::create_product)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/delete_product/{id}",
            get(admin::delete_product).post(admin::delete_product),
        )
}

/// Create all routes for the storefront.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/products", get(products::index))
        .merge(cart_routes())
        .merge(checkout_routes())
        .nest("/admin", admin_routes(max_upload_bytes))
}
