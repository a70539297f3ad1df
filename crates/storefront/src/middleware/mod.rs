//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Localization (region/locale resolution and canonical redirects)
//! 5. Rate limiting on operator endpoints (governor)

pub mod localization;
pub mod rate_limit;
pub mod request_id;

pub use localization::{CACHE_ID_COOKIE, Localization, localization_middleware};
pub use rate_limit::revalidate_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
