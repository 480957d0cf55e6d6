//! Product admin route handlers.
//!
//! These pages have no authentication; anyone who can reach the server can
//! add and delete products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::NewProduct;
use crate::routes::{ProductIdPath, ProductView};
use crate::services::{FlashLevel, FlashMessage, UploadError, UploadedImage, flash};
use crate::state::AppState;

/// Admin product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub products: Vec<ProductView>,
    pub flashes: Vec<FlashMessage>,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/new.html")]
pub struct NewProductTemplate {
    pub allowed_extensions: String,
    pub flashes: Vec<FlashMessage>,
}

/// Raw fields of the add-product form.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<UploadedImage>,
}

impl ProductForm {
    /// Read the form from a multipart body. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed or exceeds the size limit.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "name" => form.name = field.text().await?,
                "description" => form.description = field.text().await?,
                "price" => form.price = field.text().await?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    form.image = Some(UploadedImage { file_name, bytes });
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Display all products for management.
#[instrument(skip(state, session))]
pub async fn products(State(state): State<AppState>, session: Session) -> Result<AdminProductsTemplate> {
    let products = state.products().list_products().await?;

    Ok(AdminProductsTemplate {
        products: products.iter().map(ProductView::from).collect(),
        flashes: flash::take(&session).await?,
    })
}

/// Display the new product form.
#[instrument(skip(state, session))]
pub async fn new_product(State(state): State<AppState>, session: Session) -> Result<NewProductTemplate> {
    Ok(NewProductTemplate {
        allowed_extensions: state.config().uploads.allowed_extensions.join(", "),
        flashes: flash::take(&session).await?,
    })
}

/// Create a product, storing its image first.
///
/// A disallowed image type aborts before anything is written.
#[instrument(skip(state, session, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let form = ProductForm::from_multipart(&mut multipart).await?;

    let image_url = match state.uploads().save(form.image).await {
        Ok(image_url) => image_url,
        Err(UploadError::UnsupportedType { file_name }) => {
            tracing::info!(%file_name, "Rejected product image");
            let message = format!(
                "Unsupported image type. Use {}",
                state.config().uploads.allowed_extensions.join("/")
            );
            flash::push(&session, FlashLevel::Error, message).await?;
            return Ok(Redirect::to("/admin/add_product"));
        }
        Err(e) => return Err(e.into()),
    };

    let new_product = NewProduct::from_form(&form.name, &form.description, &form.price, image_url);
    let product = match state.products().insert_product(new_product.clone()).await {
        Ok(product) => product,
        Err(e) => {
            state.uploads().remove(&new_product.image_url).await;
            return Err(e.into());
        }
    };

    tracing::info!(product_id = %product.id, name = %product.name, "Product added");
    flash::push(&session, FlashLevel::Success, "Product added.").await?;
    Ok(Redirect::to("/admin/products"))
}

/// Delete a product and, best effort, its image file.
///
/// Deleting an id that does not exist still reports success.
#[instrument(skip(state, session))]
pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    ProductIdPath(id): ProductIdPath,
) -> Result<Redirect> {
    if let Some(product) = state.products().delete_product(id).await? {
        state.uploads().remove(&product.image_url).await;
        tracing::info!(product_id = %product.id, "Product deleted");
    }

    flash::push(&session, FlashLevel::Info, "Product deleted.").await?;
    Ok(Redirect::to("/admin/products"))
}
