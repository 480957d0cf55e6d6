//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ShopConfig;
use crate::db::ProductStore;
use crate::services::ImageUploads;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product store, image uploads and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    products: Arc<dyn ProductStore>,
    uploads: ImageUploads,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `products` - Product store (`PostgreSQL` in production)
    #[must_use]
    pub fn new(config: ShopConfig, products: Arc<dyn ProductStore>) -> Self {
        let uploads = ImageUploads::new(&config.uploads);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                uploads,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    /// Get a reference to the image upload store.
    #[must_use]
    pub fn uploads(&self) -> &ImageUploads {
        &self.inner.uploads
    }
}
