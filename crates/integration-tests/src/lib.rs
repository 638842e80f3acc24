//! Integration tests for AvknGifts.
//!
//! These tests drive the real router in process via `tower::ServiceExt`:
//!
//! - the catalog is the sample data file the storefront ships with,
//! - there is no database (memory sessions, ledger degraded to empty),
//! - the external gift API is a stub axum server on an ephemeral local
//!   port, so proxy behavior is exercised over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p avkn-gifts-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::Json;
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::{get, post};
use serde_json::Value;
use tower::ServiceExt;

use avkn_gifts_storefront::cart::CartLimits;
use avkn_gifts_storefront::catalog::Catalog;
use avkn_gifts_storefront::config::{AvakinConfig, StorefrontConfig};
use avkn_gifts_storefront::state::AppState;
use avkn_gifts_storefront::{middleware, routes};

/// A canned response for the stub upstream.
#[derive(Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: Value,
}

impl StubResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Spawn a stub of the external gift API on an ephemeral port.
///
/// Returns the base URL to point the storefront at.
pub async fn spawn_stub_upstream(balance: StubResponse, gift: StubResponse) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let balance_handler = move || {
        let response = balance.clone();
        async move {
            (
                StatusCode::from_u16(response.status).unwrap(),
                Json(response.body),
            )
        }
    };
    let gift_handler = move || {
        let response = gift.clone();
        async move {
            (
                StatusCode::from_u16(response.status).unwrap(),
                Json(response.body),
            )
        }
    };

    let app = Router::new()
        .route("/api/balance/{key}", get(balance_handler))
        .route("/api/gift", post(gift_handler));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A base URL that refuses connections (transport-failure scenarios).
pub async fn unreachable_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Build a storefront configuration for tests.
#[must_use]
pub fn test_config(avakin_base_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        catalog_path: fixture_catalog_path(),
        page_size: 25,
        cart_limits: CartLimits::default(),
        avakin: AvakinConfig {
            base_url: avakin_base_url.to_owned(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn fixture_catalog_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/data/items.json")
}

/// Load the sample catalog the storefront ships with.
#[must_use]
pub fn fixture_catalog() -> Catalog {
    Catalog::load(&fixture_catalog_path()).unwrap()
}

/// An in-process storefront plus a cookie jar for session continuity.
pub struct TestContext {
    app: Router,
    cookie: Option<String>,
}

impl TestContext {
    /// Storefront over the sample catalog with default cart limits.
    #[must_use]
    pub fn new(avakin_base_url: &str) -> Self {
        let config = test_config(avakin_base_url);
        let limits = config.cart_limits;
        Self::build(config, fixture_catalog(), limits)
    }

    /// Storefront with custom catalog and cart limits.
    #[must_use]
    pub fn build(config: StorefrontConfig, catalog: Catalog, limits: CartLimits) -> Self {
        let state = AppState::new(config.clone(), catalog, None, limits);
        let app =
            routes::app(state).layer(middleware::memory_session_layer(&config));

        Self { app, cookie: None }
    }

    /// Issue one request, tracking the session cookie across calls.
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_owned();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}
