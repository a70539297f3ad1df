//! End-to-end localization behaviour against a mocked commerce backend.

#![allow(clippy::unwrap_used)]

use meridian_integration_tests::{
    TestStorefront, client, default_regions, mount_regions, unreachable_addr,
};
use meridian_storefront::middleware::CACHE_ID_COOKIE;
use reqwest::{StatusCode, header};
use wiremock::MockServer;

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_geo_country() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let response = storefront
        .get("/", &[("x-vercel-ip-country", "ca")])
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/ca/en");
}

#[tokio::test]
async fn test_unknown_geo_falls_back_to_default_region() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront =
        TestStorefront::with_backend(&backend, &[("STOREFRONT_DEFAULT_REGION", "fr")]).await;

    let response = storefront
        .get(
            "/store?page=2",
            &[("x-vercel-ip-country", "jp"), ("accept-language", "fr-FR")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/fr/fr/store?page=2");
}

#[tokio::test]
async fn test_custom_geo_header() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront =
        TestStorefront::with_backend(&backend, &[("STOREFRONT_GEO_HEADER", "CF-IPCountry")])
            .await;

    let response = storefront.get("/", &[("cf-ipcountry", "DE")]).await;

    assert_eq!(location(&response), "/de/en");
}

#[tokio::test]
async fn test_cookie_is_set_once_then_requests_pass() {
    let backend = MockServer::start().await;
    // The region map is fetched once and reused across requests.
    mount_regions(&backend, default_regions(), 1).await;
    let mut storefront = TestStorefront::with_backend(&backend, &[]).await;
    storefront.client = client(true);

    let first = storefront.get("/ca/en", &[]).await;
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{CACHE_ID_COOKIE}=")));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(cookie.contains("SameSite=Lax"));

    let second = storefront.get("/ca/en", &[]).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(second.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_unsupported_locale_is_replaced() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let response = storefront.get("/ca/de", &[("accept-language", "fr")]).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/ca/fr");
}

#[tokio::test]
async fn test_coming_soon_mode() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront =
        TestStorefront::with_backend(&backend, &[("STOREFRONT_COMING_SOON", "true")]).await;

    let response = storefront
        .get("/", &[("x-vercel-ip-country", "ca")])
        .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/ca/en/coming-soon");

    let response = storefront.get("/ca/en/coming-soon", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Coming soon"));

    let response = storefront.get("/api/regions", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unreachable_backend_serves_without_localization() {
    let addr = unreachable_addr().await;
    let backend_url = format!("http://{addr}");
    let storefront = TestStorefront::start(&[
        ("COMMERCE_BACKEND_URL", backend_url.as_str()),
        ("COMMERCE_TIMEOUT_SECS", "2"),
    ])
    .await;

    let response = storefront
        .get("/ca/en", &[("x-vercel-ip-country", "ca")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_missing_backend_url_fails_page_requests() {
    let storefront = TestStorefront::start(&[]).await;

    let response = storefront.get("/", &[]).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Excluded paths never touch the backend.
    let response = storefront.get("/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_region_list_is_fatal() {
    let backend = MockServer::start().await;
    mount_regions(&backend, serde_json::json!({ "regions": [] }), 1).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let response = storefront.get("/", &[]).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_static_assets_are_never_redirected() {
    let storefront = TestStorefront::start(&[]).await;

    let response = storefront.get("/favicon.ico", &[]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::LOCATION).is_none());
}
