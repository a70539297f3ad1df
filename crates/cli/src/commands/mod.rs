//! CLI subcommands.

pub mod regions;
pub mod resolve;

use meridian_storefront::{
    commerce::CommerceError, config::ConfigError, config::StorefrontConfig, regions::RegionCache,
    regions::RegionSnapshot, state::AppState,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Commerce backend request failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),
}

/// Load configuration from the environment and fetch the region map once.
async fn load_regions() -> Result<(StorefrontConfig, Arc<RegionSnapshot>), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config.clone())?;
    let cache: &RegionCache = state.regions();

    tracing::info!("Fetching regions from commerce backend...");
    let cache_id = uuid::Uuid::new_v4().to_string();
    let snapshot = cache.refresh(&cache_id).await?;

    Ok((config, snapshot))
}
