//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Ready once a non-empty region map has been loaded. Returns 503 Service
/// Unavailable before the first successful region fetch.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.regions().current().await {
        Some(snapshot) if !snapshot.is_empty() => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}
