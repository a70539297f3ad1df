//! Integration tests for Meridian.
//!
//! Each test starts the storefront router in-process on an ephemeral port,
//! backed by a `wiremock` stand-in for the commerce backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p meridian-integration-tests
//! ```

use std::net::SocketAddr;

use meridian_storefront::{config::StorefrontConfig, routes, state::AppState};
use reqwest::{Client, redirect};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running storefront and an HTTP client that does not follow redirects.
pub struct TestStorefront {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

impl TestStorefront {
    /// Start a storefront configured from `vars`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the listener cannot bind.
    pub async fn start(vars: &[(&str, &str)]) -> Self {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = StorefrontConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("Invalid test configuration");

        let state = AppState::new(config).expect("Failed to build application state");
        let app = routes::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: client(false),
            state,
        }
    }

    /// Start a storefront backed by `backend`, with extra `vars`.
    pub async fn with_backend(backend: &MockServer, vars: &[(&str, &str)]) -> Self {
        let uri = backend.uri();
        let mut all = vec![("COMMERCE_BACKEND_URL", uri.as_str())];
        all.extend_from_slice(vars);
        Self::start(&all).await
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path` with the given headers.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, headers: &[(&str, &str)]) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Request failed")
    }
}

/// HTTP client that never follows redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client(cookie_store: bool) -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .cookie_store(cookie_store)
        .build()
        .expect("Failed to create HTTP client")
}

/// A backend region body as the store API returns it.
#[must_use]
pub fn region(id: &str, name: &str, currency: &str, countries: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "currency_code": currency,
        "countries": countries
            .iter()
            .map(|c| json!({ "iso_2": c }))
            .collect::<Vec<_>>(),
    })
}

/// North America (us, ca) and Europe (fr, de).
#[must_use]
pub fn default_regions() -> Value {
    json!({
        "regions": [
            region("reg_na", "North America", "usd", &["us", "ca"]),
            region("reg_eu", "Europe", "eur", &["fr", "de"]),
        ]
    })
}

/// Mount `GET /store/regions` returning `body`, expected `times` times.
pub async fn mount_regions(backend: &MockServer, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/store/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(backend)
        .await;
}

/// An address nothing is listening on.
///
/// # Panics
///
/// Panics if no ephemeral port can be reserved.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve port");
    listener.local_addr().expect("Listener has no local address")
}
