//! Region map inspection.
//!
//! # Usage
//!
//! ```bash
//! mrd-cli regions
//! ```
//!
//! # Environment Variables
//!
//! - `COMMERCE_BACKEND_URL` - Commerce backend base URL
//! - `COMMERCE_PUBLISHABLE_KEY` - Publishable API key (optional)

use super::{CommandError, load_regions};

/// Fetch the region map and log each country with its region.
pub async fn list() -> Result<(), CommandError> {
    let (_, snapshot) = load_regions().await?;

    for country in snapshot.countries() {
        let Some(region) = snapshot.get(country) else {
            continue;
        };
        tracing::info!(
            "{country}  {}  {}  {}",
            region.id,
            region.name.as_deref().unwrap_or("-"),
            region.currency_code.as_deref().unwrap_or("-"),
        );
    }

    tracing::info!(
        "{} countries across {} regions",
        snapshot.len(),
        snapshot.regions().len()
    );
    Ok(())
}
