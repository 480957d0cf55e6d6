//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! bazaar-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the storefront: `BAZAAR_DATABASE_URL` (or
//! `DATABASE_URL`), or the `BAZAAR_DB_*` parts.
//!
//! # Migration Files
//!
//! Product migrations live in `crates/storefront/migrations/` and are
//! embedded at compile time. The session table belongs to
//! `tower-sessions-sqlx-store` and is created by its own migration.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use bazaar_storefront::config::{ConfigError, DatabaseConfig};
use bazaar_storefront::db;

/// Errors from the migrate command.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run product and session migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database = DatabaseConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database).await?;

    products(&pool).await?;
    sessions(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

async fn products(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Running product migrations...");
    sqlx::migrate!("../storefront/migrations").run(pool).await?;
    Ok(())
}

async fn sessions(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Running session store migration...");
    PostgresStore::new(pool.clone()).migrate().await?;
    Ok(())
}
