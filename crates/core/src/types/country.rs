//! ISO 3166-1 alpha-2 country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input string is empty.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not exactly two characters.
    #[error("country code must be exactly 2 letters (got {0})")]
    InvalidLength(usize),
    /// The input contains something other than ASCII letters.
    #[error("country code must contain only ASCII letters")]
    InvalidCharacters,
}

/// A two-letter country code, always stored lowercase.
///
/// Country codes key the region map and form the first segment of every
/// canonical storefront URL (`/<country>/<locale>/...`).
///
/// ## Examples
///
/// ```
/// use meridian_core::CountryCode;
///
/// let ca = CountryCode::parse("CA").unwrap();
/// assert_eq!(ca.as_str(), "ca");
///
/// assert!(CountryCode::parse("").is_err());
/// assert!(CountryCode::parse("can").is_err());
/// assert!(CountryCode::parse("c1").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Length of an alpha-2 code.
    pub const LENGTH: usize = 2;

    /// Parse a `CountryCode`, normalizing to lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not two characters long, or
    /// contains anything but ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        if s.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        let len = s.chars().count();
        if len != Self::LENGTH {
            return Err(CountryCodeError::InvalidLength(len));
        }

        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::InvalidCharacters);
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The United States (`us`), the storefront's fallback region.
    #[must_use]
    pub fn united_states() -> Self {
        Self(String::from("us"))
    }

    /// Returns the code as a lowercase string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CountryCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(CountryCode::parse("CA").unwrap().as_str(), "ca");
        assert_eq!(CountryCode::parse("Fr").unwrap().as_str(), "fr");
        assert_eq!(CountryCode::parse("us").unwrap().as_str(), "us");
    }

    #[test]
    fn test_united_states_matches_parsed() {
        assert_eq!(CountryCode::united_states(), CountryCode::parse("US").unwrap());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CountryCode::parse(""), Err(CountryCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            CountryCode::parse("usa"),
            Err(CountryCodeError::InvalidLength(3))
        );
        assert_eq!(
            CountryCode::parse("u"),
            Err(CountryCodeError::InvalidLength(1))
        );
    }

    #[test]
    fn test_parse_non_letters() {
        assert_eq!(
            CountryCode::parse("u1"),
            Err(CountryCodeError::InvalidCharacters)
        );
        assert_eq!(
            CountryCode::parse("é!"),
            Err(CountryCodeError::InvalidCharacters)
        );
    }

    #[test]
    fn test_display() {
        let code = CountryCode::parse("DE").unwrap();
        assert_eq!(format!("{code}"), "de");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let code: CountryCode = serde_json::from_str("\"GB\"").unwrap();
        assert_eq!(code.as_str(), "gb");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"gb\"");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<CountryCode>("\"\"").is_err());
        assert!(serde_json::from_str::<CountryCode>("\"gbr\"").is_err());
    }
}
