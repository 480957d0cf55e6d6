//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! No database is needed: the router runs against [`MemoryProductStore`]
//! and an in-memory session store, with a temporary static directory for
//! uploads. Requests go through `tower::ServiceExt::oneshot`.
//!
//! # Test Categories
//!
//! - `catalog` - Product listing and health checks
//! - `cart_flow` - Add/remove through the session cart
//! - `checkout_flow` - Order capture and confirmation
//! - `admin_products` - Product creation, uploads and deletion

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use bazaar_core::ProductId;
use bazaar_storefront::config::{DatabaseConfig, ShopConfig, UploadConfig};
use bazaar_storefront::db::{ProductStore, RepositoryError};
use bazaar_storefront::middleware::{SESSION_COOKIE_NAME, session_layer};
use bazaar_storefront::models::{NewProduct, Product};
use bazaar_storefront::state::AppState;

// =============================================================================
// In-memory Product Store
// =============================================================================

/// Product store backed by a `Vec`, with a switch to simulate an outage.
#[derive(Default)]
pub struct MemoryProductStore {
    products: Mutex<Vec<Product>>,
    last_id: AtomicI32,
    unavailable: AtomicBool,
}

impl MemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Change a stored price in place (the app never does this).
    pub fn set_price(&self, id: ProductId, price: Decimal) {
        if let Some(product) = self.lock().iter_mut().find(|product| product.id == id) {
            product.price = price;
        }
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.check_available()?;
        let mut products = self.lock().clone();
        products.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.check_available()?;
        Ok(self.lock().iter().find(|product| product.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        self.check_available()?;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = Product {
            id: ProductId::new(id),
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
        };
        self.lock().push(product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.check_available()?;
        let mut products = self.lock();
        Ok(products
            .iter()
            .position(|product| product.id == id)
            .map(|index| products.remove(index)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

// =============================================================================
// Router Harness
// =============================================================================

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body as UTF-8 text (lossy).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// The storefront router with an in-memory store and a cookie jar of one.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryProductStore>,
    pub static_dir: TempDir,
    cookie: Option<String>,
}

impl TestApp {
    /// Build an app with default upload limits.
    ///
    /// # Panics
    ///
    /// Panics if the temporary static directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_upload_limit(bazaar_storefront::config::DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Build an app with a custom upload size limit.
    ///
    /// # Panics
    ///
    /// Panics if the temporary static directory cannot be created.
    #[must_use]
    pub fn with_upload_limit(max_bytes: usize) -> Self {
        let static_dir = tempfile::tempdir().expect("create temp static dir");
        let mut uploads = UploadConfig::with_static_dir(static_dir.path());
        uploads.max_bytes = max_bytes;

        let config = ShopConfig {
            database: DatabaseConfig::Url(SecretString::from("postgres://unused/bazaar")),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            uploads,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let store = Arc::new(MemoryProductStore::new());
        let layer = session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, store.clone());

        Self {
            router: bazaar_storefront::app(state, layer),
            store,
            static_dir,
            cookie: None,
        }
    }

    /// Path of a file under the static root.
    #[must_use]
    pub fn static_path(&self, relative: &str) -> PathBuf {
        self.static_dir.path().join(relative)
    }

    /// Insert a product directly into the store.
    ///
    /// # Panics
    ///
    /// Panics if the store is marked unavailable.
    pub async fn seed_product(&self, name: &str, price: &str, image_url: &str) -> Product {
        self.store
            .insert_product(NewProduct::from_form(name, "", price, image_url.to_string()))
            .await
            .expect("seed product")
    }

    /// Drop the session cookie, as a new visitor would arrive.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// Send a POST with an empty body.
    pub async fn post(&mut self, uri: &str) -> TestResponse {
        self.send(Request::post(uri), Body::empty()).await
    }

    /// Send a POST with an already-encoded `application/x-www-form-urlencoded` body.
    pub async fn post_form(&mut self, uri: &str, encoded: &str) -> TestResponse {
        let builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(builder, Body::from(encoded.to_string())).await
    }

    /// Send a POST with a multipart body.
    pub async fn post_multipart(&mut self, uri: &str, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        let builder = Request::post(uri).header(header::CONTENT_TYPE, content_type);
        self.send(builder, Body::from(body)).await
    }

    /// Follow a redirect response with a GET.
    ///
    /// # Panics
    ///
    /// Panics if the response has no `Location` header.
    pub async fn follow(&mut self, response: &TestResponse) -> TestResponse {
        let location = response
            .location()
            .expect("response should be a redirect")
            .to_string();
        self.get(&location).await
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        };
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            if let Some(pair) = value.split(';').next()
                && pair.starts_with(&format!("{SESSION_COOKIE_NAME}="))
            {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Multipart Builder
// =============================================================================

const BOUNDARY: &str = "bazaar-test-boundary-7MA4YWxkTrZu0gW";

/// Minimal `multipart/form-data` encoder for admin form tests.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    /// Start an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the form, returning the content type and body.
    #[must_use]
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}
