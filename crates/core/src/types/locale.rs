//! Supported UI locales.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a supported locale.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// A supported UI language.
///
/// The set is closed: every resolution path ends in one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// All supported locales, in preference order.
    pub const ALL: [Self; 2] = [Self::En, Self::Fr];

    /// Returns the two-letter code used in URLs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Returns the locale matching `code` exactly, if supported.
    ///
    /// Matching is case-sensitive: URL segments must already be canonical.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.code() == code)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.trim().to_ascii_lowercase()).ok_or_else(|| LocaleError(s.to_string()))
    }
}
