//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Commerce backend
//! - `COMMERCE_BACKEND_URL` - Base URL of the commerce backend. Not required at
//!   startup; every region fetch fails with a configuration error until it is set.
//! - `COMMERCE_PUBLISHABLE_KEY` - Publishable API key sent with store requests
//! - `COMMERCE_TIMEOUT_SECS` - Backend request timeout (default: 10)
//!
//! ## Localization
//! - `STOREFRONT_DEFAULT_REGION` - Fallback country code (default: us)
//! - `STOREFRONT_DEFAULT_LOCALE` - Fallback locale (default: en)
//! - `STOREFRONT_COMING_SOON` - Redirect page traffic to the coming-soon page
//!   (`true`, `1`, `yes`, `on`; default: off)
//! - `STOREFRONT_GEO_HEADER` - Geo country header set by the hosting platform
//!   (default: x-vercel-ip-country)
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use meridian_core::{CountryCode, Locale};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default geo header (Vercel edge network).
pub const DEFAULT_GEO_HEADER: &str = "x-vercel-ip-country";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Commerce backend configuration
    pub commerce: CommerceConfig,
    /// Region and locale resolution settings
    pub localization: LocalizationConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Commerce backend configuration.
///
/// Implements `Debug` manually to redact the publishable key.
#[derive(Clone)]
pub struct CommerceConfig {
    /// Backend base URL (e.g. <https://api.example.com>)
    pub backend_url: Option<Url>,
    /// Publishable API key for store endpoints
    pub publishable_key: Option<SecretString>,
    /// Request timeout for backend calls
    pub timeout: Duration,
}

impl std::fmt::Debug for CommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceConfig")
            .field("backend_url", &self.backend_url.as_ref().map(Url::as_str))
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            publishable_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Region and locale resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationConfig {
    /// Country used when neither the URL nor the geo header resolves
    pub default_region: CountryCode,
    /// Locale used when neither the URL nor `accept-language` resolves
    pub default_locale: Locale,
    /// Whether page traffic is redirected to the coming-soon page
    pub coming_soon: bool,
    /// Lowercase name of the geo country header
    pub geo_header: String,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_region: CountryCode::united_states(),
            default_locale: Locale::En,
            coming_soon: false,
            geo_header: DEFAULT_GEO_HEADER.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_or_default(&lookup, "STOREFRONT_PORT", "3000")?;
        let base_url = get_or_default(&lookup, "STOREFRONT_BASE_URL", "http://localhost:3000");

        let commerce = CommerceConfig::from_lookup(&lookup)?;
        let localization = LocalizationConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            base_url,
            commerce,
            localization,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_or_default(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns true when the public site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CommerceConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = get_optional(lookup, "COMMERCE_BACKEND_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("COMMERCE_BACKEND_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let publishable_key = get_optional(lookup, "COMMERCE_PUBLISHABLE_KEY").map(SecretString::from);
        let timeout_secs: u64 = parse_or_default(lookup, "COMMERCE_TIMEOUT_SECS", "10")?;

        Ok(Self {
            backend_url,
            publishable_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl LocalizationConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_region = get_or_default(lookup, "STOREFRONT_DEFAULT_REGION", "us");
        let default_region = CountryCode::parse(&default_region).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_DEFAULT_REGION".to_string(), e.to_string())
        })?;

        let default_locale = get_or_default(lookup, "STOREFRONT_DEFAULT_LOCALE", "en")
            .parse::<Locale>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_DEFAULT_LOCALE".to_string(), e.to_string())
            })?;

        let coming_soon = get_optional(lookup, "STOREFRONT_COMING_SOON")
            .is_some_and(|raw| parse_flag(&raw));

        let geo_header =
            get_or_default(lookup, "STOREFRONT_GEO_HEADER", DEFAULT_GEO_HEADER).to_ascii_lowercase();

        Ok(Self {
            default_region,
            default_locale,
            coming_soon,
            geo_header,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable (or its default) into `T`.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(lookup, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Interpret a boolean-like string (`true`, `1`, `yes`, `on`).
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
