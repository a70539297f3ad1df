//! Commerce regions.

use serde::{Deserialize, Serialize};

use super::CountryCode;

/// Opaque region identifier assigned by the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Wrap a backend region id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pricing/fulfillment zone grouping one or more countries.
///
/// Regions are fetched wholesale from the backend and never mutated after
/// they are cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    /// Display name, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ISO 4217 currency code, lowercase as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Countries served by this region, in backend order.
    pub countries: Vec<CountryCode>,
}

impl Region {
    /// Create a region with only an id and its countries.
    #[must_use]
    pub fn new(id: impl Into<String>, countries: Vec<CountryCode>) -> Self {
        Self {
            id: RegionId::new(id),
            name: None,
            currency_code: None,
            countries,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cc(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn test_serialize_skips_missing_optionals() {
        let region = Region::new("reg_eu", vec![cc("fr")]);
        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "reg_eu", "countries": ["fr"] })
        );
    }
}
