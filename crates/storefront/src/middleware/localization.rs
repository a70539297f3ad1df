//! Localization middleware: resolves country and locale for every page
//! request and enforces canonical `/<country>/<locale>/...` URLs.
//!
//! Region lookups go through the shared [`RegionCache`](crate::regions::RegionCache).
//! Configuration and data errors from the backend abort the request. Network
//! failures are logged and the request is served without localization.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite, time::Duration};
use meridian_core::{CountryCode, Locale};
use uuid::Uuid;

use crate::error::{AppError, add_breadcrumb};
use crate::localization::{self, Decision, RequestFacts, Resolution, policy};
use crate::state::AppState;

/// Name of the cache-identity cookie.
pub const CACHE_ID_COOKIE: &str = "_meridian_cache_id";

/// Cache-identity cookie lifetime (24 hours).
const CACHE_ID_MAX_AGE_HOURS: i64 = 24;

/// Country and locale resolved for the current request.
///
/// Inserted into request extensions by [`localization_middleware`] when the
/// URL is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    pub country: CountryCode,
    pub locale: Locale,
}

/// Middleware that applies the redirect policy.
///
/// # Errors
///
/// Returns `AppError::Commerce` when the region map cannot be loaded because
/// the deployment is misconfigured or the backend returned unusable data.
pub async fn localization_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_owned();

    if policy::is_excluded_path(&path) {
        return Ok(next.run(request).await);
    }

    let config = &state.config().localization;
    let headers = request.headers();

    let cookie = read_cookie(headers, CACHE_ID_COOKIE);
    let has_cache_cookie = cookie.is_some();
    let cache_id = cookie.unwrap_or_else(|| Uuid::new_v4().to_string());

    let regions = match state.regions().get(&cache_id).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(error = %message, "Region lookup failed, serving without localization");
            add_breadcrumb(
                "localization",
                "Region lookup failed",
                Some(&[("error", message.as_str())]),
            );
            None
        }
    };

    let resolution = localization::localize(
        &RequestFacts {
            path: &path,
            query: request.uri().query(),
            has_cache_cookie,
            accept_language: header_str(headers, ACCEPT_LANGUAGE.as_str()),
            geo: header_str(headers, &config.geo_header),
        },
        config,
        regions.as_deref(),
    );
    let Resolution {
        locale,
        country,
        decision,
    } = resolution;

    match &country {
        Some(resolved) => tracing::debug!(
            country = %resolved.code,
            source = resolved.source.as_str(),
            locale = %locale,
            "Resolved request localization"
        ),
        None => tracing::warn!(path = %path, "No country resolved, skipping redirect"),
    }

    tracing::debug!(state = decision.state(), "Redirect policy decision");

    if let Some(target) = decision.redirect_target() {
        return Ok(Redirect::temporary(target).into_response());
    }

    if let Some(resolved) = country
        && localization::locale_from_path(&path).is_some()
    {
        request.extensions_mut().insert(Localization {
            country: resolved.code,
            locale,
        });
    }

    let mut response = next.run(request).await;

    if decision == Decision::SetCookieAndPass {
        let cookie = cache_id_cookie(&cache_id, state.config().is_secure());
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Invalid cache id cookie value"),
        }
    }

    Ok(response)
}

/// Extractor for the request's resolved localization.
///
/// Rejects with 404 when the middleware did not localize the request.
impl<S> FromRequestParts<S> for Localization
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(StatusCode::NOT_FOUND)
    }
}

impl<S> OptionalFromRequestParts<S> for Localization
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}

/// Read a header as a string, ignoring non-UTF-8 values.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Find a cookie value across all `Cookie` headers.
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// Build the cache-identity cookie.
fn cache_id_cookie(cache_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((CACHE_ID_COOKIE, cache_id.to_string()))
        .max_age(Duration::hours(CACHE_ID_MAX_AGE_HOURS))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
