//! Core types for Meridian.
//!
//! This module provides type-safe wrappers for the localization domain.

pub mod country;
pub mod locale;
pub mod region;

pub use country::{CountryCode, CountryCodeError};
pub use locale::{Locale, LocaleError};
pub use region::{Region, RegionId};
