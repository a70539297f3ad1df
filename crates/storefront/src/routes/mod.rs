//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (region map loaded)
//!
//! # Localized pages
//! GET  /{country}/{locale}              - Landing page
//! GET  /{country}/{locale}/coming-soon  - Coming-soon page
//!
//! # Region API (never localized)
//! GET  /api/regions                     - Cached region map as JSON
//! POST /api/regions/revalidate          - Force a region refetch (rate limited)
//!
//! # Assets
//! GET  /static/*                        - Static files
//! ```
//!
//! Every other path goes through the localization middleware first, which
//! redirects it to its canonical `/<country>/<locale>/...` form.

pub mod api;
pub mod health;
pub mod home;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::{localization_middleware, request_id_middleware, revalidate_rate_limiter};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the region API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(api::list_regions))
        .route(
            "/regions/revalidate",
            post(api::revalidate).route_layer(revalidate_rate_limiter()),
        )
}

/// Create the localized page routes.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/{country}/{locale}", get(home::landing))
        .route("/{country}/{locale}/coming-soon", get(home::coming_soon))
}

/// Build the complete storefront application with all middleware applied.
///
/// Sentry layers are added by the binary on top of this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(page_routes())
        .nest("/api", api_routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(home::not_found)
        .layer(from_fn_with_state(state.clone(), localization_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
