//! Integration tests for the catalog pages and health checks.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use bazaar_integration_tests::TestApp;

// =============================================================================
// Health Checks
// =============================================================================

#[tokio::test]
async fn test_health_is_ok() {
    let mut app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_readiness_follows_store_availability() {
    let mut app = TestApp::new();
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);

    app.store.set_unavailable(true);
    assert_eq!(
        app.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let mut app = TestApp::new();

    let response = app.get("/health").await;

    assert!(response.headers.contains_key("x-request-id"));
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_links_to_catalog_and_cart() {
    let mut app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("href=\"/products\""));
    assert!(body.contains("href=\"/cart\""));
}

#[tokio::test]
async fn test_products_listed_newest_first() {
    let mut app = TestApp::new();
    app.seed_product("Older Mug", "8.00", "").await;
    app.seed_product("Newer Tote", "22.50", "").await;

    let response = app.get("/products").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    let newer = body.find("Newer Tote").unwrap_or(usize::MAX);
    let older = body.find("Older Mug").unwrap_or(usize::MAX);
    assert!(newer < older, "newest product should be listed first");
    assert!(body.contains("$22.50"));
    assert!(body.contains("/add_to_cart/2"));
}

#[tokio::test]
async fn test_empty_catalog_renders() {
    let mut app = TestApp::new();

    let response = app.get("/products").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("No products yet."));
}

#[tokio::test]
async fn test_product_image_is_served_from_static_root() {
    let mut app = TestApp::new();
    std::fs::create_dir_all(app.static_path("uploads")).unwrap();
    std::fs::write(app.static_path("uploads/mug.png"), b"png bytes").unwrap();
    app.seed_product("Mug", "8.00", "uploads/mug.png").await;

    let listing = app.get("/products").await.text();
    assert!(listing.contains("src=\"/static/uploads/mug.png\""));

    let image = app.get("/static/uploads/mug.png").await;
    assert_eq!(image.status, StatusCode::OK);
    assert_eq!(image.body, b"png bytes");
}

#[tokio::test]
async fn test_store_outage_is_a_generic_server_error() {
    let mut app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app.get("/products").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal server error");
}
