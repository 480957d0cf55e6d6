//! Integration tests for product administration.
//!
//! Covers product creation with image uploads, the upload allow list and
//! size limit, and deletion with best-effort image cleanup.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use rust_decimal::Decimal;

use bazaar_integration_tests::{MultipartForm, TestApp};
use bazaar_storefront::db::ProductStore;

fn product_form(name: &str, price: &str) -> MultipartForm {
    MultipartForm::new()
        .text("name", name)
        .text("description", "Speckled enamel")
        .text("price", price)
}

// =============================================================================
// Listing and Forms
// =============================================================================

#[tokio::test]
async fn test_admin_list_has_post_delete_forms() {
    let mut app = TestApp::new();
    let mug = app.seed_product("Enamel Mug", "10.00", "").await;

    let response = app.get("/admin/products").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Enamel Mug"));
    assert!(body.contains(&format!(
        "<form method=\"post\" action=\"/admin/delete_product/{}\">",
        mug.id
    )));
}

#[tokio::test]
async fn test_add_product_form_renders() {
    let mut app = TestApp::new();

    let response = app.get("/admin/add_product").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert!(body.contains("png, jpg, jpeg, webp, gif"));
}

// =============================================================================
// Creating
// =============================================================================

#[tokio::test]
async fn test_add_product_with_image() {
    let mut app = TestApp::new();
    let form = product_form("Enamel Mug", "12.50").file("image", "photo.PNG", b"fake png");

    let response = app.post_multipart("/admin/add_product", form).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/products"));

    let products = app.store.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.name, "Enamel Mug");
    assert_eq!(product.description, "Speckled enamel");
    assert_eq!(product.price, Decimal::new(1250, 2));
    assert_eq!(product.image_url, "uploads/photo.png");
    assert_eq!(std::fs::read(app.static_path("uploads/photo.png")).unwrap(), b"fake png");

    let body = app.follow(&response).await.text();
    assert!(body.contains("flash-success"));
    assert!(body.contains("Product added."));
}

#[tokio::test]
async fn test_add_product_without_image() {
    let mut app = TestApp::new();

    let response = app
        .post_multipart("/admin/add_product", product_form("Notebook", "6"))
        .await;

    assert_eq!(response.location(), Some("/admin/products"));
    let products = app.store.list_products().await.unwrap();
    assert_eq!(products[0].image_url, "");
}

#[tokio::test]
async fn test_empty_file_field_counts_as_no_image() {
    let mut app = TestApp::new();
    let form = product_form("Notebook", "6").file("image", "", b"");

    let response = app.post_multipart("/admin/add_product", form).await;

    assert_eq!(response.location(), Some("/admin/products"));
    assert_eq!(app.store.list_products().await.unwrap()[0].image_url, "");
}

#[tokio::test]
async fn test_malformed_price_becomes_zero() {
    let mut app = TestApp::new();

    app.post_multipart("/admin/add_product", product_form("Freebie", "abc"))
        .await;
    app.post_multipart("/admin/add_product", product_form("Refund", "-5"))
        .await;

    let products = app.store.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|product| product.price.is_zero()));
}

#[tokio::test]
async fn test_disallowed_image_type_is_rejected() {
    let mut app = TestApp::new();
    let form = product_form("Malware", "1.00").file("image", "photo.EXE", b"MZ");

    let response = app.post_multipart("/admin/add_product", form).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/add_product"));
    assert!(app.store.is_empty());
    assert!(!app.static_path("uploads/photo.exe").exists());
    assert!(!app.static_path("uploads/photo.EXE").exists());

    let body = app.follow(&response).await.text();
    assert!(body.contains("flash-error"));
    assert!(body.contains("Unsupported image type."));
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut app = TestApp::with_upload_limit(1024);
    let form = product_form("Huge", "1.00").file("image", "huge.png", &[0_u8; 4096]);

    let response = app.post_multipart("/admin/add_product", form).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.store.is_empty());
    assert!(!app.static_path("uploads/huge.png").exists());
}

#[tokio::test]
async fn test_store_failure_removes_saved_image() {
    let mut app = TestApp::new();
    app.store.set_unavailable(true);
    let form = product_form("Mug", "1.00").file("image", "mug.png", b"png");

    let response = app.post_multipart("/admin/add_product", form).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!app.static_path("uploads/mug.png").exists());
}

// =============================================================================
// Deleting
// =============================================================================

#[tokio::test]
async fn test_delete_product_removes_row_and_image() {
    let mut app = TestApp::new();
    let form = product_form("Enamel Mug", "12.50").file("image", "mug.png", b"png");
    app.post_multipart("/admin/add_product", form).await;
    let product = app.store.list_products().await.unwrap().remove(0);
    assert!(app.static_path("uploads/mug.png").exists());

    let response = app
        .post(&format!("/admin/delete_product/{}", product.id))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/products"));
    assert!(app.store.is_empty());
    assert!(!app.static_path("uploads/mug.png").exists());

    let body = app.follow(&response).await.text();
    assert!(body.contains("Product deleted."));
}

#[tokio::test]
async fn test_delete_with_missing_image_file_succeeds() {
    let mut app = TestApp::new();
    let product = app.seed_product("Ghost", "3.00", "uploads/gone.png").await;

    let response = app
        .get(&format!("/admin/delete_product/{}", product.id))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(app.store.is_empty());
    let body = app.follow(&response).await.text();
    assert!(body.contains("flash-info"));
    assert!(body.contains("Product deleted."));
}

#[tokio::test]
async fn test_delete_unknown_product_is_idempotent() {
    let mut app = TestApp::new();
    app.seed_product("Keeper", "3.00", "").await;

    let response = app.get("/admin/delete_product/999").await;

    assert_eq!(response.location(), Some("/admin/products"));
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_delete_with_malformed_id_is_not_found() {
    let mut app = TestApp::new();
    app.seed_product("Keeper", "3.00", "").await;

    let response = app.post("/admin/delete_product/-1").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.len(), 1);
}
