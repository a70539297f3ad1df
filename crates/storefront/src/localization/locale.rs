//! Locale resolution.

use meridian_core::Locale;

use super::path_segment;

/// Resolve the request locale. Always returns a supported locale.
///
/// Precedence:
/// 1. The second URL segment, if it is a supported locale code
/// 2. The first supported entry of `accept-language`
/// 3. `default`
#[must_use]
pub fn resolve_locale(path: &str, accept_language: Option<&str>, default: Locale) -> Locale {
    locale_from_path(path)
        .or_else(|| accept_language.and_then(locale_from_accept_language))
        .unwrap_or(default)
}

/// Locale named by the URL's second segment (`/<country>/<locale>/...`).
#[must_use]
pub fn locale_from_path(path: &str) -> Option<Locale> {
    path_segment(path, 1).and_then(Locale::from_code)
}

/// First supported language in an `accept-language` header.
///
/// Each comma-separated entry is reduced to its first two characters,
/// lowercased, ignoring `;q=` qualifiers. Header order wins over q-values.
#[must_use]
pub fn locale_from_accept_language(header: &str) -> Option<Locale> {
    header.split(',').find_map(|entry| {
        let tag = entry.split(';').next().unwrap_or(entry).trim();
        let prefix: String = tag.chars().take(2).collect::<String>().to_lowercase();
        Locale::from_code(&prefix)
    })
}
