//! Region and locale resolution.
//!
//! Every page URL has the canonical shape `/<country>/<locale>/<rest>`. The
//! pieces here are pure functions over request signals and a
//! [`RegionSnapshot`](crate::regions::RegionSnapshot):
//!
//! - [`locale`] - URL segment, then `accept-language`, then the default
//! - [`country`] - URL segment, then geo header, then the default, then the first cached country
//! - [`policy`] - decides between passing the request through and redirecting
//!   it to its canonical URL
//!
//! [`localize`] runs all three in order. The HTTP glue lives in
//! [`crate::middleware::localization`]; the CLI dry run calls [`localize`]
//! directly.

pub mod country;
pub mod locale;
pub mod policy;

use meridian_core::Locale;

pub use country::{CountrySource, ResolvedCountry, resolve_country};
pub use locale::{locale_from_accept_language, locale_from_path, resolve_locale};
pub use policy::{Decision, PolicyOptions, RequestFacts, decide};

use crate::config::LocalizationConfig;
use crate::regions::RegionSnapshot;

/// Everything resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,
    /// `None` when no region map is available or it is empty.
    pub country: Option<ResolvedCountry>,
    pub decision: Decision,
}

/// Resolve locale and country, then apply the redirect policy.
///
/// `regions` is `None` when the region map could not be loaded.
#[must_use]
pub fn localize(
    request: &RequestFacts<'_>,
    config: &LocalizationConfig,
    regions: Option<&RegionSnapshot>,
) -> Resolution {
    let locale = resolve_locale(request.path, request.accept_language, config.default_locale);
    let country = regions.and_then(|snapshot| {
        resolve_country(request.path, request.geo, &config.default_region, snapshot)
    });

    let decision = decide(
        request,
        country.as_ref().map(|resolved| &resolved.code),
        locale,
        &PolicyOptions {
            coming_soon: config.coming_soon,
            default_region: &config.default_region,
        },
    );

    Resolution {
        locale,
        country,
        decision,
    }
}

/// Returns the `index`-th path segment (0-based, ignoring the leading `/`).
///
/// `"/ca/en/store"` has segments `ca`, `en`, `store`.
pub(crate) fn path_segment(path: &str, index: usize) -> Option<&str> {
    path.split('/').nth(index + 1)
}

/// Returns what follows the first `count` segments, including its leading `/`.
///
/// `rest_after_segments("/ca/en/store", 1)` is `"/en/store"`;
/// `rest_after_segments("/ca", 1)` is `""`.
pub(crate) fn rest_after_segments(path: &str, count: usize) -> &str {
    let mut rest = path;
    for _ in 0..count {
        let Some(stripped) = rest.strip_prefix('/') else {
            return "";
        };
        rest = stripped
            .find('/')
            .and_then(|idx| stripped.get(idx..))
            .unwrap_or("");
    }
    rest
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use meridian_core::{CountryCode, Region};

    use super::*;

    fn snapshot() -> RegionSnapshot {
        RegionSnapshot::from_regions(
            vec![Region::new(
                "reg_na",
                vec![
                    CountryCode::parse("us").unwrap(),
                    CountryCode::parse("ca").unwrap(),
                ],
            )],
            Utc::now(),
        )
    }

    fn facts<'a>(
        path: &'a str,
        geo: Option<&'a str>,
        accept_language: Option<&'a str>,
    ) -> RequestFacts<'a> {
        RequestFacts {
            path,
            query: None,
            has_cache_cookie: false,
            accept_language,
            geo,
        }
    }

    #[test]
    fn test_localize_redirects_bare_root() {
        let map = snapshot();
        let resolution = localize(
            &facts("/", Some("ca"), Some("fr-CA")),
            &LocalizationConfig::default(),
            Some(&map),
        );
        assert_eq!(resolution.locale, Locale::Fr);
        assert_eq!(resolution.country.unwrap().source, CountrySource::Geo);
        assert_eq!(
            resolution.decision,
            Decision::RedirectAddCountryAndLocale("/ca/fr".to_string())
        );
    }

    #[test]
    fn test_localize_without_regions_passes() {
        let resolution = localize(
            &facts("/store", Some("ca"), None),
            &LocalizationConfig::default(),
            None,
        );
        assert_eq!(resolution.country, None);
        assert_eq!(resolution.locale, Locale::En);
        assert_eq!(resolution.decision, Decision::Pass);
    }

    #[test]
    fn test_localize_honours_coming_soon() {
        let map = snapshot();
        let config = LocalizationConfig {
            coming_soon: true,
            ..LocalizationConfig::default()
        };
        let resolution = localize(&facts("/ca/en/store", None, None), &config, Some(&map));
        assert_eq!(
            resolution.decision,
            Decision::RedirectToComingSoon("/ca/en/coming-soon".to_string())
        );
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("/ca/en/store", 0), Some("ca"));
        assert_eq!(path_segment("/ca/en/store", 1), Some("en"));
        assert_eq!(path_segment("/ca/en/store", 2), Some("store"));
        assert_eq!(path_segment("/ca/en/store", 3), None);
        assert_eq!(path_segment("/", 0), Some(""));
        assert_eq!(path_segment("/ca", 1), None);
    }

    #[test]
    fn test_rest_after_segments() {
        assert_eq!(rest_after_segments("/ca/en/store", 0), "/ca/en/store");
        assert_eq!(rest_after_segments("/ca/en/store", 1), "/en/store");
        assert_eq!(rest_after_segments("/ca/en/store", 2), "/store");
        assert_eq!(rest_after_segments("/ca/en/store", 3), "");
        assert_eq!(rest_after_segments("/ca", 1), "");
        assert_eq!(rest_after_segments("/ca/", 1), "/");
        assert_eq!(rest_after_segments("/", 1), "");
    }
}
