//! Database operations for the product store.
//!
//! # Database
//!
//! ## Tables
//!
//! - `products` - Catalog rows (id, name, description, price, image_url)
//! - `tower_sessions.session` - Tower-sessions storage (cart, order info, flashes)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use bazaar_core::ProductId;

use crate::config::DatabaseConfig;
use crate::models::{NewProduct, Product};

pub use products::PgProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent product catalog.
///
/// Handlers only see this trait, so tests can swap in an in-memory store.
/// "Not found" is never an error: lookups return `Option`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest (highest id) first.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, or `None` if the id does not exist.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product and return it with its store-assigned id.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Delete a product, returning the removed row if there was one.
    ///
    /// Deleting a missing id is a no-op.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Connections are checked out per query and returned to the pool when the
/// guard drops, on success and error paths alike.
///
/// # Errors
///
/// Returns `sqlx::Error` if the options are invalid or the connection cannot
/// be established.
pub async fn create_pool(database: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(database.connect_options()?)
        .await
}
