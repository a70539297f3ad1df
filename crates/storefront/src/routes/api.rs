//! JSON API for the cached region map.
//!
//! These routes sit under `/api` and are never localized.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use meridian_core::{CountryCode, Region};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::regions::RegionSnapshot;
use crate::state::AppState;

/// Region map as served to clients.
#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    /// When the map was fetched from the backend.
    pub refreshed_at: DateTime<Utc>,
    /// Served countries in resolution order.
    pub countries: Vec<CountryCode>,
    /// Distinct regions.
    pub regions: Vec<Region>,
}

impl From<&RegionSnapshot> for RegionsResponse {
    fn from(snapshot: &RegionSnapshot) -> Self {
        Self {
            refreshed_at: snapshot.refreshed_at(),
            countries: snapshot.countries().cloned().collect(),
            regions: snapshot.regions().into_iter().cloned().collect(),
        }
    }
}

/// List the cached region map, refreshing it if stale.
///
/// # Errors
///
/// Returns an error when no region map is available.
#[instrument(skip(state))]
pub async fn list_regions(State(state): State<AppState>) -> Result<Json<RegionsResponse>> {
    let cache_id = Uuid::new_v4().to_string();
    let snapshot = state.regions().get(&cache_id).await?;
    Ok(Json(RegionsResponse::from(snapshot.as_ref())))
}

/// Drop the cached map's freshness and refetch it now.
///
/// # Errors
///
/// Returns an error if the refetch fails. The previous map stays in place
/// and is refetched again on the next request.
#[instrument(skip(state))]
pub async fn revalidate(State(state): State<AppState>) -> Result<Json<RegionsResponse>> {
    let cache_id = Uuid::new_v4().to_string();
    state.regions().invalidate();
    let snapshot = state.regions().refresh(&cache_id).await?;
    tracing::info!(countries = snapshot.len(), "Region map revalidated");
    Ok(Json(RegionsResponse::from(snapshot.as_ref())))
}
