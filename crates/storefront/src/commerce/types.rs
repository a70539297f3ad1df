//! Wire types for the commerce backend's store API.

use serde::Deserialize;

/// Response body of `GET /store/regions`.
#[derive(Debug, Deserialize)]
pub struct RegionsResponse {
    #[serde(default)]
    pub regions: Vec<RegionPayload>,
}

/// A region as sent by the backend.
#[derive(Debug, Deserialize)]
pub struct RegionPayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub countries: Vec<CountryPayload>,
}

/// A country entry inside a region.
#[derive(Debug, Deserialize)]
pub struct CountryPayload {
    #[serde(default)]
    pub iso_2: Option<String>,
}

/// Error body returned by the backend on failures.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
