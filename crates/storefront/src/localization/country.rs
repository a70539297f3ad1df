//! Country resolution.

use meridian_core::CountryCode;

use super::path_segment;
use crate::regions::RegionSnapshot;

/// Which signal produced a resolved country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySource {
    /// First URL segment.
    Url,
    /// Hosting platform geo header.
    Geo,
    /// Configured default region.
    Default,
    /// First country in the cached map.
    FirstAvailable,
}

impl CountrySource {
    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Geo => "geo",
            Self::Default => "default",
            Self::FirstAvailable => "first_available",
        }
    }
}

/// A country drawn from the region map, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCountry {
    pub code: CountryCode,
    pub source: CountrySource,
}

/// Resolve the request country against the cached region map.
///
/// Precedence, first match wins:
/// 1. First URL segment, if it is a cached country
/// 2. `geo` header value, if it is a cached country
/// 3. `default_region`, if it is a cached country
/// 4. First cached country in insertion order
///
/// Returns `None` only when the snapshot is empty.
#[must_use]
pub fn resolve_country(
    path: &str,
    geo: Option<&str>,
    default_region: &CountryCode,
    regions: &RegionSnapshot,
) -> Option<ResolvedCountry> {
    let found = |code: &CountryCode, source| ResolvedCountry {
        code: code.clone(),
        source,
    };

    if let Some(code) = path_segment(path, 0).and_then(|segment| regions.lookup(segment)) {
        return Some(found(code, CountrySource::Url));
    }

    if let Some(code) = geo.and_then(|value| regions.lookup(value)) {
        return Some(found(code, CountrySource::Geo));
    }

    if regions.contains(default_region) {
        return Some(found(default_region, CountrySource::Default));
    }

    regions
        .first_country()
        .map(|code| found(code, CountrySource::FirstAvailable))
}
