//! Localized page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use meridian_core::Locale;
use tracing::instrument;

use crate::middleware::Localization;
use crate::state::AppState;

/// Region details shown on localized pages.
struct RegionSummary {
    name: String,
    currency: String,
}

/// Landing page for a country and locale.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub country: String,
    pub locale: String,
    pub region_name: String,
    pub currency: String,
}

/// Coming-soon page shown while the storefront is closed.
#[derive(Template, WebTemplate)]
#[template(path = "coming_soon.html")]
pub struct ComingSoonTemplate {
    pub country: String,
    pub locale: String,
}

/// 404 page.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub locale: String,
}

/// Display the landing page.
///
/// Falls back to the raw path segments when the request was served without
/// localization (region map unavailable).
#[instrument(skip_all, fields(country = %country, locale = %locale))]
pub async fn landing(
    State(state): State<AppState>,
    localization: Option<Localization>,
    Path((country, locale)): Path<(String, String)>,
) -> HomeTemplate {
    let (country, locale) = match localization {
        Some(l) => (l.country.into_inner(), l.locale.code().to_string()),
        None => (country.to_ascii_lowercase(), locale.to_ascii_lowercase()),
    };

    let summary = region_summary(&state, &country).await;

    HomeTemplate {
        country,
        locale,
        region_name: summary.name,
        currency: summary.currency,
    }
}

/// Display the coming-soon page.
#[instrument(skip_all, fields(country = %country, locale = %locale))]
pub async fn coming_soon(
    localization: Option<Localization>,
    Path((country, locale)): Path<(String, String)>,
) -> ComingSoonTemplate {
    match localization {
        Some(l) => ComingSoonTemplate {
            country: l.country.into_inner(),
            locale: l.locale.code().to_string(),
        },
        None => ComingSoonTemplate {
            country: country.to_ascii_lowercase(),
            locale: locale.to_ascii_lowercase(),
        },
    }
}

/// Fallback for unmatched routes.
pub async fn not_found(localization: Option<Localization>) -> impl IntoResponse {
    let locale = localization.map_or(Locale::default(), |l| l.locale);
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            locale: locale.code().to_string(),
        },
    )
}

async fn region_summary(state: &AppState, country: &str) -> RegionSummary {
    let snapshot = state.regions().current().await;
    let region = snapshot.as_deref().and_then(|snapshot| {
        snapshot
            .lookup(country)
            .and_then(|code| snapshot.get(code))
            .cloned()
    });

    match region {
        Some(region) => RegionSummary {
            name: region.name.unwrap_or_else(|| region.id.to_string()),
            currency: region
                .currency_code
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or_default(),
        },
        None => RegionSummary {
            name: String::new(),
            currency: String::new(),
        },
    }
}
