//! Commerce backend REST client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for regions; nothing is persisted locally
//! - Store endpoints authenticate with a publishable API key header
//! - Responses are decoded from text so error bodies can be logged verbatim
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//! let regions = client.list_regions("cache-id").await?;
//! ```

mod types;

use std::sync::Arc;

use meridian_core::{CountryCode, Region, RegionId};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::CommerceConfig;

use types::{ApiErrorBody, RegionPayload, RegionsResponse};

/// Header carrying the publishable API key.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// The backend base URL is not configured. Indicates a broken deployment.
    #[error("commerce backend URL is not configured (set COMMERCE_BACKEND_URL)")]
    Configuration,

    /// The backend answered but the data is unusable.
    #[error("region data error: {0}")]
    Data(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CommerceError {
    /// Returns true for errors that must abort the request instead of
    /// degrading to unlocalized content.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration | Self::Data(_))
    }
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce backend's store API.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: Option<Url>,
    publishable_key: Option<SecretString>,
}

impl CommerceClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CommerceConfig) -> Result<Self, CommerceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.backend_url.clone(),
                publishable_key: config.publishable_key.clone(),
            }),
        })
    }

    /// Build the URL for a store endpoint, tolerating a trailing slash on the base.
    fn endpoint(&self, path: &str) -> Result<String, CommerceError> {
        let base = self
            .inner
            .base_url
            .as_ref()
            .ok_or(CommerceError::Configuration)?;
        Ok(format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    /// List all regions from `GET /store/regions`.
    ///
    /// `cache_id` identifies the browser that triggered the fetch and is
    /// recorded on the span for correlation.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no backend URL is set
    /// - `Data` on a non-success status or an empty region list
    /// - `Http`/`Parse` on transport or decoding failures
    #[instrument(skip(self), fields(region_count))]
    pub async fn list_regions(&self, cache_id: &str) -> Result<Vec<Region>, CommerceError> {
        let url = self.endpoint("store/regions")?;

        let mut request = self.inner.client.get(&url);
        if let Some(key) = &self.inner.publishable_key {
            request = request.header(PUBLISHABLE_KEY_HEADER, key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| response_text.chars().take(200).collect());
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Commerce backend returned non-success status"
            );
            return Err(CommerceError::Data(format!("HTTP {status}: {message}")));
        }

        let payload: RegionsResponse = match serde_json::from_str(&response_text) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse region list"
                );
                return Err(CommerceError::Parse(e));
            }
        };

        if payload.regions.is_empty() {
            return Err(CommerceError::Data(
                "no regions found; create at least one region in the commerce admin".to_string(),
            ));
        }

        let regions: Vec<Region> = payload.regions.into_iter().map(convert_region).collect();
        tracing::Span::current().record("region_count", regions.len());

        Ok(regions)
    }
}

/// Convert a wire region, skipping countries without a usable `iso_2` code.
fn convert_region(payload: RegionPayload) -> Region {
    let countries = payload
        .countries
        .into_iter()
        .filter_map(|country| {
            let raw = country.iso_2.unwrap_or_default();
            match CountryCode::parse(&raw) {
                Ok(code) => Some(code),
                Err(e) => {
                    tracing::warn!(
                        region_id = %payload.id,
                        iso_2 = %raw,
                        error = %e,
                        "Skipping country with invalid code"
                    );
                    None
                }
            }
        })
        .collect();

    Region {
        id: RegionId::new(payload.id),
        name: payload.name,
        currency_code: payload.currency_code,
        countries,
    }
}
