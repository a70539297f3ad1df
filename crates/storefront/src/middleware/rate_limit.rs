//! Rate limiting for operator endpoints using governor and `tower_governor`.
//!
//! Forcing a region refetch costs a backend round trip, so the revalidation
//! endpoint gets a tight per-client budget.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{extract::ConnectInfo, http::Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Client IP headers set by the edge network, in order of trust.
const CLIENT_IP_HEADERS: &[&str] = &["x-real-ip", "cf-connecting-ip", "fly-client-ip"];

/// Key extractor that reads the client IP from edge proxy headers.
///
/// Single-value headers are tried first, then the last hop of
/// `X-Forwarded-For` (the one appended by the nearest proxy, which a client
/// cannot choose). Without any of these the TCP peer address is used.
#[derive(Clone, Copy)]
pub struct EdgeIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for EdgeIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        for name in CLIENT_IP_HEADERS {
            if let Some(ip) = headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
            {
                return Ok(ip);
            }
        }

        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.rsplit(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<EdgeIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for region revalidation: ~2 requests per minute per IP.
///
/// Configuration: 1 request every 30 seconds (replenish), burst of 2.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(30)` and `burst_size(2)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn revalidate_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(EdgeIpKeyExtractor)
        .per_second(30)
        .burst_size(2)
        .finish()
        .expect("rate limiter config with per_second(30) and burst_size(2) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/regions/revalidate");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_prefers_single_value_headers() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "203.0.113.7"),
        ]);
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_uses_last_forwarded_hop() {
        let req = request(&[("x-forwarded-for", "1.2.3.4, 198.51.100.4")]);
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "198.51.100.4");
    }

    #[test]
    fn test_spoofed_forwarded_prefix_does_not_change_key() {
        let first = request(&[("x-forwarded-for", "10.9.9.1, 198.51.100.4")]);
        let second = request(&[("x-forwarded-for", "10.9.9.2, 198.51.100.4")]);
        assert_eq!(
            EdgeIpKeyExtractor.extract(&first).unwrap(),
            EdgeIpKeyExtractor.extract(&second).unwrap()
        );
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[]);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 51_000))));
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.10");
    }

    #[test]
    fn test_no_headers_and_no_peer_is_an_error() {
        let req = request(&[]);
        assert!(EdgeIpKeyExtractor.extract(&req).is_err());
    }
}
