//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (one of)
//! - `BAZAAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `BAZAAR_DB_USER` + `BAZAAR_DB_NAME` - connection parts, with optional
//!   `BAZAAR_DB_HOST` (default: localhost), `BAZAAR_DB_PORT` (default: 5432)
//!   and `BAZAAR_DB_PASSWORD`
//!
//! ## Optional
//! - `BAZAAR_HOST` - Bind address (default: 127.0.0.1)
//! - `BAZAAR_PORT` - Listen port (default: 3000)
//! - `BAZAAR_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `BAZAAR_STATIC_DIR` - Public static root (default: crates/storefront/static)
//! - `BAZAAR_UPLOAD_SUBDIR` - Upload directory under the static root (default: uploads)
//! - `BAZAAR_MAX_UPLOAD_BYTES` - Upload request size limit (default: 5 MB)
//! - `BAZAAR_ALLOWED_IMAGE_EXTENSIONS` - Comma-separated list (default: png,jpg,jpeg,webp,gif)
//! - `BAZAAR_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Default upload size limit (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default image extensions accepted by the upload handler.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Product store connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Image upload settings
    pub uploads: UploadConfig,
    /// Emit JSON logs instead of human-readable text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Product store connection settings.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub enum DatabaseConfig {
    /// Full connection URL (may embed a password).
    Url(SecretString),
    /// Individual connection parts.
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<SecretString>,
        name: String,
    },
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            Self::Parts {
                host,
                port,
                user,
                password,
                name,
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &password.as_ref().map(|_| "[REDACTED]"))
                .field("name", name)
                .finish(),
        }
    }
}

/// Image upload settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Public static root; stored image paths are relative to it.
    pub static_dir: PathBuf,
    /// Upload directory, relative to `static_dir`.
    pub subdir: String,
    /// Maximum accepted request body size for uploads.
    pub max_bytes: usize,
    /// Lowercase extensions (without the dot) accepted for images.
    pub allowed_extensions: Vec<String>,
}

impl UploadConfig {
    /// Upload settings rooted at `static_dir` with default limits.
    #[must_use]
    pub fn with_static_dir(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            subdir: "uploads".to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }

    /// Absolute (or working-directory relative) upload directory.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join(&self.subdir)
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        let host = parse_env("BAZAAR_HOST", "127.0.0.1")?;
        let port = parse_env("BAZAAR_PORT", "3000")?;
        let base_url = get_env_or_default("BAZAAR_BASE_URL", "http://localhost:3000");
        let uploads = UploadConfig::from_env()?;
        let json_logs = match get_env_or_default("BAZAAR_LOG_FORMAT", "text").as_str() {
            "json" => true,
            "text" => false,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "BAZAAR_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            database,
            host,
            port,
            base_url,
            uploads,
            json_logs,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl DatabaseConfig {
    /// Load database settings from environment variables.
    ///
    /// A connection URL wins over individual parts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither a URL nor the required parts are set,
    /// or if the port is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(url) = get_optional_env("BAZAAR_DATABASE_URL")
            .or_else(|| get_optional_env("DATABASE_URL"))
        {
            return Ok(Self::Url(SecretString::from(url)));
        }

        Ok(Self::Parts {
            host: get_env_or_default("BAZAAR_DB_HOST", "localhost"),
            port: parse_env("BAZAAR_DB_PORT", "5432")?,
            user: get_required_env("BAZAAR_DB_USER")?,
            password: get_optional_env("BAZAAR_DB_PASSWORD").map(SecretString::from),
            name: get_required_env("BAZAAR_DB_NAME")?,
        })
    }

    /// Build `sqlx` connect options.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection URL cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            Self::Url(url) => PgConnectOptions::from_str(url.expose_secret()),
            Self::Parts {
                host,
                port,
                user,
                password,
                name,
            } => {
                let options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .database(name);
                Ok(match password {
                    Some(password) => options.password(password.expose_secret()),
                    None => options,
                })
            }
        }
    }
}

impl UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let static_dir = PathBuf::from(get_env_or_default(
            "BAZAAR_STATIC_DIR",
            "crates/storefront/static",
        ));
        let subdir = get_env_or_default("BAZAAR_UPLOAD_SUBDIR", "uploads");
        if subdir.is_empty() || subdir.contains("..") || subdir.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "BAZAAR_UPLOAD_SUBDIR".to_string(),
                "must be a relative path inside the static directory".to_string(),
            ));
        }

        let max_bytes = parse_env("BAZAAR_MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?;

        let allowed_extensions = match get_optional_env("BAZAAR_ALLOWED_IMAGE_EXTENSIONS") {
            Some(raw) => parse_extension_list(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "BAZAAR_ALLOWED_IMAGE_EXTENSIONS".to_string(),
                    "must list at least one extension".to_string(),
                )
            })?,
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        };

        Ok(Self {
            static_dir,
            subdir,
            max_bytes,
            allowed_extensions,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a comma-separated extension list into lowercase entries without dots.
///
/// Returns `None` if the list has no usable entries.
fn parse_extension_list(raw: &str) -> Option<Vec<String>> {
    let extensions: Vec<String> = raw
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    (!extensions.is_empty()).then_some(extensions)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ShopConfig {
        ShopConfig {
            database: DatabaseConfig::Url(SecretString::from("postgres://localhost/bazaar")),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            uploads: UploadConfig::with_static_dir("static"),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_base_url_scheme() {
        let mut config = test_config();
        assert!(!config.is_secure());

        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_upload_defaults() {
        let uploads = UploadConfig::with_static_dir("static");
        assert_eq!(uploads.max_bytes, 5 * 1024 * 1024);
        assert_eq!(uploads.allowed_extensions, ["png", "jpg", "jpeg", "webp", "gif"]);
        assert_eq!(uploads.upload_dir(), PathBuf::from("static/uploads"));
    }

    #[test]
    fn test_parse_extension_list_normalizes_entries() {
        let parsed = parse_extension_list(" PNG, .jpg ,,webp").unwrap();
        assert_eq!(parsed, ["png", "jpg", "webp"]);
    }

    #[test]
    fn test_parse_extension_list_rejects_empty() {
        assert!(parse_extension_list(" , ,").is_none());
    }

    #[test]
    fn test_database_config_debug_redacts_secrets() {
        let url = DatabaseConfig::Url(SecretString::from("postgres://u:hunter2@db/shop"));
        assert!(!format!("{url:?}").contains("hunter2"));

        let parts = DatabaseConfig::Parts {
            host: "db.internal".to_string(),
            port: 5432,
            user: "shop".to_string(),
            password: Some(SecretString::from("hunter2")),
            name: "bazaar".to_string(),
        };
        let debug_output = format!("{parts:?}");
        assert!(debug_output.contains("db.internal"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_connect_options_from_parts() {
        let parts = DatabaseConfig::Parts {
            host: "db.internal".to_string(),
            port: 6543,
            user: "shop".to_string(),
            password: None,
            name: "bazaar".to_string(),
        };
        let options = parts.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "shop");
        assert_eq!(options.get_database(), Some("bazaar"));
    }

    #[test]
    fn test_connect_options_rejects_bad_url() {
        let url = DatabaseConfig::Url(SecretString::from("not a url"));
        assert!(url.connect_options().is_err());
    }
}
