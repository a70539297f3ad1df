//! Application state shared across handlers.

use std::sync::Arc;

use crate::commerce::{CommerceClient, CommerceError};
use crate::config::StorefrontConfig;
use crate::regions::RegionCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the region cache and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    regions: RegionCache,
}

impl AppState {
    /// Create a new application state with an empty region cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the commerce HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CommerceError> {
        let client = CommerceClient::new(&config.commerce)?;
        Ok(Self::with_regions(config, RegionCache::new(client)))
    }

    /// Create application state around an existing region cache.
    #[must_use]
    pub fn with_regions(config: StorefrontConfig, regions: RegionCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, regions }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared region cache.
    #[must_use]
    pub fn regions(&self) -> &RegionCache {
        &self.inner.regions
    }
}
