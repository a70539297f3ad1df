//! Redirect policy dry run.
//!
//! Fetches the live region map and reports what the storefront would do with
//! a request, without starting the server.
//!
//! # Usage
//!
//! ```bash
//! mrd-cli resolve /products/shirt?variant=3 --geo ca --accept-language "fr-CA,fr;q=0.9"
//! ```

use meridian_storefront::config::LocalizationConfig;
use meridian_storefront::localization::{self, Decision, RequestFacts, Resolution};
use meridian_storefront::regions::RegionSnapshot;

use super::{CommandError, load_regions};

/// Simulated request signals.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Path with optional `?query`.
    pub url: String,
    /// Geo header value.
    pub geo: Option<String>,
    /// `Accept-Language` header value.
    pub accept_language: Option<String>,
    /// Whether the cache-id cookie is present.
    pub has_cookie: bool,
}

/// Resolve localization for a simulated request and log the decision.
pub async fn run(request: &ResolveRequest) -> Result<Decision, CommandError> {
    let (path, _) = split_url(&request.url);
    if localization::policy::is_excluded_path(&path) {
        tracing::info!("{path} is excluded from localization");
        return Ok(Decision::Pass);
    }

    let (config, snapshot) = load_regions().await?;
    let Resolution {
        locale,
        country,
        decision,
    } = evaluate(request, &config.localization, &snapshot);

    match &country {
        Some(resolved) => tracing::info!(
            "country: {} (from {})",
            resolved.code,
            resolved.source.as_str()
        ),
        None => tracing::info!("country: none (region map is empty)"),
    }
    tracing::info!("locale: {locale}");

    match decision.redirect_target() {
        Some(target) => tracing::info!("{} -> 307 {target}", decision.state()),
        None => tracing::info!("{}", decision.state()),
    }

    Ok(decision)
}

/// Run the storefront's resolution against an already loaded region map.
fn evaluate(
    request: &ResolveRequest,
    config: &LocalizationConfig,
    snapshot: &RegionSnapshot,
) -> Resolution {
    let (path, query) = split_url(&request.url);

    localization::localize(
        &RequestFacts {
            path: &path,
            query,
            has_cache_cookie: request.has_cookie,
            accept_language: request.accept_language.as_deref(),
            geo: request.geo.as_deref(),
        },
        config,
        Some(snapshot),
    )
}

/// Split `url` into a path (always starting with `/`) and an optional query.
fn split_url(url: &str) -> (String, Option<&str>) {
    let (path, query) = url
        .split_once('?')
        .map_or((url, None), |(path, query)| (path, Some(query)));

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    (path, query)
}
