//! HTTP client implementation for the external gift API.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::avakin::AvakinError;
use crate::avakin::types::GiftRequest;
use crate::config::AvakinConfig;

/// A relayed upstream response: HTTP status plus JSON body, preserved
/// verbatim so proxy routes can pass it through unchanged.
#[derive(Debug, Clone)]
pub struct Relayed {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Relayed {
    /// Whether the upstream status was 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Typed view of the body, when it matches `T`.
    #[must_use]
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// Client for the external gift API.
#[derive(Clone)]
pub struct AvakinClient {
    inner: Arc<AvakinClientInner>,
}

struct AvakinClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AvakinClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &AvakinConfig) -> Self {
        Self {
            inner: Arc::new(AvakinClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Look up the balance of a key.
    ///
    /// # Errors
    ///
    /// Returns [`AvakinError`] only on transport failure; upstream error
    /// statuses are relayed as data.
    #[instrument(skip_all)]
    pub async fn get_balance(&self, key: &str) -> Result<Relayed, AvakinError> {
        let url = format!("{}/api/balance/{key}", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        Self::relay(response).await
    }

    /// Send a typed gift request built by the orchestration layer.
    ///
    /// # Errors
    ///
    /// Returns [`AvakinError`] on transport failure or if the request body
    /// cannot be encoded.
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn send_gift(&self, request: &GiftRequest) -> Result<Relayed, AvakinError> {
        let body = serde_json::to_value(request)?;
        self.send_gift_raw(&body).await
    }

    /// Forward a gift request body verbatim (the pure proxy path).
    ///
    /// # Errors
    ///
    /// Returns [`AvakinError`] on transport failure.
    #[instrument(skip_all)]
    pub async fn send_gift_raw(&self, body: &serde_json::Value) -> Result<Relayed, AvakinError> {
        let url = format!("{}/api/gift", self.inner.base_url);
        let response = self.inner.client.post(&url).json(body).send().await?;
        Self::relay(response).await
    }

    async fn relay(response: reqwest::Response) -> Result<Relayed, AvakinError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        // Non-JSON upstream bodies degrade to an empty object, matching the
        // frontend's tolerant parse of this API.
        let body = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));

        Ok(Relayed { status, body })
    }
}
