//! Meridian Core - Shared types library.
//!
//! This crate provides the domain types used across Meridian components:
//! - `storefront` - Localized, multi-region storefront server
//! - `cli` - Command-line tools for inspecting regions and resolution
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for country codes, locales, and regions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
