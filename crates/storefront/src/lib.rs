//! Meridian storefront library.
//!
//! Region and locale resolution for a multi-region storefront: every page
//! request is matched against the commerce backend's region map and
//! redirected to its canonical `/<country>/<locale>/...` URL.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commerce;
pub mod config;
pub mod error;
pub mod localization;
pub mod middleware;
pub mod regions;
pub mod routes;
pub mod state;
