//! Redirect policy for canonical `/<country>/<locale>/...` URLs.
//!
//! Rules are evaluated in a fixed order, first match wins:
//!
//! 1. Excluded paths (static assets, API, health) pass untouched
//! 2. Coming-soon mode redirects page traffic to the coming-soon page
//! 3. Valid locale under a country segment that is not lowercase gets the
//!    lowercase country
//! 4. Valid country and locale segments with a cache-id cookie pass
//! 5. Valid country and locale segments without the cookie pass and set it
//! 6. Valid country with an unsupported locale code gets that code replaced
//! 7. Valid country without a locale gets one inserted
//! 8. Missing country gets country and locale prepended
//! 9. Nothing resolvable (empty region map) passes unlocalized
//!
//! Country segments match case-insensitively, so `/CA/en` resolves to `ca`
//! and then redirects to `/ca/en`.
//!
//! A request that already has a canonical URL and the cookie always passes,
//! so applying the policy to its own output never loops.

use meridian_core::{CountryCode, Locale};

use super::{locale_from_path, path_segment, rest_after_segments};

/// Path of the coming-soon page under a locale prefix.
pub const COMING_SOON_SEGMENT: &str = "coming-soon";

/// Request signals the policy looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts<'a> {
    /// URL path, starting with `/`.
    pub path: &'a str,
    /// Raw query string without the leading `?`.
    pub query: Option<&'a str>,
    /// Whether the cache-id cookie was sent.
    pub has_cache_cookie: bool,
    /// Raw `accept-language` header.
    pub accept_language: Option<&'a str>,
    /// Raw geo country header.
    pub geo: Option<&'a str>,
}

/// Deployment switches that shape the policy.
#[derive(Debug, Clone, Copy)]
pub struct PolicyOptions<'a> {
    pub coming_soon: bool,
    pub default_region: &'a CountryCode,
}

/// Outcome of the policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Serve the request as-is.
    Pass,
    /// Serve the request and attach a cache-id cookie to the response.
    SetCookieAndPass,
    /// Redirect to the coming-soon page.
    RedirectToComingSoon(String),
    /// Rewrite a country segment that is not lowercase.
    RedirectLowercaseCountry(String),
    /// Replace an unsupported locale segment.
    RedirectWithLocale(String),
    /// Insert the missing locale segment.
    RedirectAddLocale(String),
    /// Prepend country and locale segments.
    RedirectAddCountryAndLocale(String),
}

impl Decision {
    /// Redirect target, if this decision redirects.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Pass | Self::SetCookieAndPass => None,
            Self::RedirectToComingSoon(target)
            | Self::RedirectLowercaseCountry(target)
            | Self::RedirectWithLocale(target)
            | Self::RedirectAddLocale(target)
            | Self::RedirectAddCountryAndLocale(target) => Some(target),
        }
    }

    /// State name for logs.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::SetCookieAndPass => "set_cookie_and_pass",
            Self::RedirectToComingSoon(_) => "redirect_to_coming_soon",
            Self::RedirectLowercaseCountry(_) => "redirect_lowercase_country",
            Self::RedirectWithLocale(_) => "redirect_with_locale",
            Self::RedirectAddLocale(_) => "redirect_add_locale",
            Self::RedirectAddCountryAndLocale(_) => "redirect_add_country_and_locale",
        }
    }
}

/// Decide what to do with a request.
///
/// `country` is the resolved country, or `None` when the region map is
/// empty. `locale` is the resolved locale.
#[must_use]
pub fn decide(
    request: &RequestFacts<'_>,
    country: Option<&CountryCode>,
    locale: Locale,
    options: &PolicyOptions<'_>,
) -> Decision {
    let path = request.path;

    if is_excluded_path(path) {
        return Decision::Pass;
    }

    if options.coming_soon && !is_coming_soon_path(path) && !is_api_path(path) {
        let country = country.unwrap_or(options.default_region);
        return Decision::RedirectToComingSoon(format!(
            "/{country}/{locale}/{COMING_SOON_SEGMENT}"
        ));
    }

    let Some(country) = country else {
        return Decision::Pass;
    };

    let query = query_suffix(request.query);
    let country_segment = path_segment(path, 0)
        .filter(|segment| segment.eq_ignore_ascii_case(country.as_str()));

    if let Some(segment) = country_segment {
        if locale_from_path(path).is_some() {
            if segment != country.as_str() {
                let rest = rest_after_segments(path, 2);
                return Decision::RedirectLowercaseCountry(format!(
                    "/{country}/{locale}{rest}{query}"
                ));
            }

            return if request.has_cache_cookie {
                Decision::Pass
            } else {
                Decision::SetCookieAndPass
            };
        }

        if path_segment(path, 1).is_some_and(looks_like_locale) {
            let rest = rest_after_segments(path, 2);
            return Decision::RedirectWithLocale(format!("/{country}/{locale}{rest}{query}"));
        }

        let rest = rest_after_segments(path, 1);
        return Decision::RedirectAddLocale(format!("/{country}/{locale}{rest}{query}"));
    }

    let rest = if path == "/" { "" } else { path };
    Decision::RedirectAddCountryAndLocale(format!("/{country}/{locale}{rest}{query}"))
}

/// Paths that are never localized.
#[must_use]
pub fn is_excluded_path(path: &str) -> bool {
    is_static_asset(path) || is_api_path(path) || is_health_path(path)
}

/// Static assets are recognised by a dot anywhere in the path.
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    path.contains('.')
}

/// `/api` and everything below it.
#[must_use]
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn is_health_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/health/")
}

fn is_coming_soon_path(path: &str) -> bool {
    path.contains("/coming-soon")
}

/// A two-letter alphabetic segment sitting in the locale slot.
fn looks_like_locale(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_alphabetic())
}

fn query_suffix(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => String::new(),
    }
}
