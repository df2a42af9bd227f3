//! HTTP client for the site market API.
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/prices` | none |
//! | GET | `/inventory` | none |
//! | GET | `/machines` | `X-Api-Key` |
//! | PUT | `/machines` | `X-Api-Key` |

use super::error::{MarketError, MarketResult};
use super::source::MarketDataSource;
use super::types::SiteStatus;
use async_trait::async_trait;
use optera_kernel::{AllocationVector, InventorySpec, PriceSnapshot};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MARKET_BASE_URL: &str = "https://mara-hackathon-api.onrender.com";

/// Connection settings for [`HttpMarketClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketClientConfig {
    pub base_url: String,
    /// Sent as `X-Api-Key` on machine endpoints
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for MarketClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Live [`MarketDataSource`] backed by the site API.
pub struct HttpMarketClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpMarketClient {
    pub fn new(config: MarketClientConfig) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketError::Config(e.to_string()))?;

        if config.api_key.trim().is_empty() {
            warn!("site API key is empty; /machines calls will likely be rejected");
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("X-Api-Key", &self.api_key)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> MarketResult<T> {
        let resp = builder.send().await.map_err(|e| MarketError::Request {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| MarketError::Request {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(MarketError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint, bytes = body.len(), "upstream response");
        serde_json::from_str(&body).map_err(|e| MarketError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketClient {
    fn name(&self) -> &str {
        "site-api"
    }

    #[instrument(skip(self))]
    async fn prices(&self) -> MarketResult<Vec<PriceSnapshot>> {
        self.execute("GET /prices", self.client.get(self.url("/prices")))
            .await
    }

    #[instrument(skip(self))]
    async fn inventory(&self) -> MarketResult<InventorySpec> {
        self.execute("GET /inventory", self.client.get(self.url("/inventory")))
            .await
    }

    #[instrument(skip(self))]
    async fn site_status(&self) -> MarketResult<SiteStatus> {
        let req = self.authed(self.client.get(self.url("/machines")));
        self.execute("GET /machines", req).await
    }

    #[instrument(skip(self, allocation), fields(allocation = %allocation))]
    async fn update_allocation(
        &self,
        allocation: &AllocationVector,
    ) -> MarketResult<serde_json::Value> {
        let req = self
            .authed(self.client.put(self.url("/machines")))
            .json(allocation);
        self.execute("PUT /machines", req).await
    }
}
