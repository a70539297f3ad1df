//! Region API and readiness against a mocked commerce backend.

#![allow(clippy::unwrap_used)]

use meridian_integration_tests::{TestStorefront, default_regions, mount_regions, region};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_regions_in_backend_order() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let response = storefront.get("/api/regions", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["countries"], json!(["us", "ca", "fr", "de"]));
    assert_eq!(body["regions"][0]["id"], "reg_na");
    assert_eq!(body["regions"][1]["currency_code"], "eur");
}

#[tokio::test]
async fn test_readiness_follows_region_cache() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 1).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let response = storefront.get("/health/ready", &[]).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    storefront.get("/api/regions", &[]).await;

    let response = storefront.get("/health/ready", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_revalidate_refetches_regions() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 2).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    storefront.get("/api/regions", &[]).await;

    let response = storefront
        .client
        .post(storefront.url("/api/regions/revalidate"))
        .header("x-forwarded-for", "203.0.113.9")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["countries"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_revalidate_is_rate_limited() {
    let backend = MockServer::start().await;
    mount_regions(
        &backend,
        json!({ "regions": [region("reg_uk", "United Kingdom", "gbp", &["gb"])] }),
        2,
    )
    .await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = storefront
            .client
            .post(storefront.url("/api/regions/revalidate"))
            .header("x-forwarded-for", "198.51.100.20")
            .send()
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[tokio::test]
async fn test_revalidate_without_ip_headers_is_limited_by_peer() {
    let backend = MockServer::start().await;
    mount_regions(&backend, default_regions(), 2).await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = storefront
            .client
            .post(storefront.url("/api/regions/revalidate"))
            .send()
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[tokio::test]
async fn test_failed_revalidate_keeps_previous_map_and_timestamp() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_regions()))
        .up_to_n_times(1)
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "maintenance" })),
        )
        .expect(2)
        .mount(&backend)
        .await;
    let storefront = TestStorefront::with_backend(&backend, &[]).await;

    let before: Value = storefront
        .get("/api/regions", &[])
        .await
        .json()
        .await
        .unwrap();

    let response = storefront
        .client
        .post(storefront.url("/api/regions/revalidate"))
        .header("x-real-ip", "192.0.2.7")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The forced refetch fails again and the previous map is served.
    let response = storefront.get("/api/regions", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let after: Value = response.json().await.unwrap();
    assert_eq!(after["countries"], before["countries"]);
    assert_eq!(after["refreshed_at"], before["refreshed_at"]);
}
