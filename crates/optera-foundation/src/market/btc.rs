//! Bitcoin quotes from the Yahoo Finance chart API.

use super::error::{MarketError, MarketResult};
use super::source::BtcPriceSource;
use super::types::BtcQuote;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{instrument, warn};

/// Settings for [`YahooBtcClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BtcClientConfig {
    pub symbol: String,
    /// Chart endpoint without the trailing symbol
    pub chart_url: String,
    pub timeout_secs: u64,
}

impl Default for BtcClientConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC-USD".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Live BTC quote source.
///
/// Remembers the last successful quote; a failed fetch serves that, or
/// [`BtcQuote::fallback`] if nothing was ever fetched.
pub struct YahooBtcClient {
    url: String,
    client: Client,
    last_known: RwLock<Option<BtcQuote>>,
}

impl YahooBtcClient {
    pub fn new(config: BtcClientConfig) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("optera/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketError::Config(e.to_string()))?;

        Ok(Self {
            url: format!(
                "{}/{}",
                config.chart_url.trim_end_matches('/'),
                config.symbol
            ),
            client,
            last_known: RwLock::new(None),
        })
    }

    pub fn last_known(&self) -> Option<BtcQuote> {
        self.last_known.read().clone()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> MarketResult<BtcQuote> {
        const ENDPOINT: &str = "GET chart";

        let resp = self
            .client
            .get(&self.url)
            .query(&[("range", "1d"), ("interval", "5m")])
            .send()
            .await
            .map_err(|e| MarketError::Request {
                endpoint: ENDPOINT.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MarketError::Status {
                endpoint: ENDPOINT.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChartEnvelope = resp.json().await.map_err(|e| MarketError::Decode {
            endpoint: ENDPOINT.to_string(),
            message: e.to_string(),
        })?;

        envelope
            .chart
            .result
            .unwrap_or_default()
            .first()
            .and_then(quote_from_chart)
            .ok_or_else(|| MarketError::Decode {
                endpoint: ENDPOINT.to_string(),
                message: "chart contained no closing prices".to_string(),
            })
    }
}

#[async_trait]
impl BtcPriceSource for YahooBtcClient {
    async fn quote(&self) -> BtcQuote {
        match self.fetch().await {
            Ok(quote) => {
                *self.last_known.write() = Some(quote.clone());
                quote
            }
            Err(e) => {
                warn!(error = %e, "BTC quote fetch failed; serving cached data");
                self.last_known().unwrap_or_else(BtcQuote::fallback)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chart response
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Build a quote from one day of 5-minute candles. Null candles are skipped.
fn quote_from_chart(result: &ChartResult) -> Option<BtcQuote> {
    let series = result.indicators.quote.first()?;

    let closes: Vec<(usize, f64)> = series
        .close
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.map(|c| (i, c)))
        .collect();
    let &(last_idx, price) = closes.last()?;
    let previous = closes.len().checked_sub(2).map_or(price, |i| closes[i].1);

    let change_24h = price - previous;
    let change_percent = if previous != 0.0 {
        change_24h / previous * 100.0
    } else {
        0.0
    };

    let high_24h = series.high.iter().flatten().copied().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |a| a.max(v)))
    });
    let low_24h = series.low.iter().flatten().copied().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |a| a.min(v)))
    });

    let timestamp = result
        .timestamp
        .get(last_idx)
        .and_then(|&ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now)
        .to_rfc3339();

    Some(BtcQuote {
        price,
        change_24h,
        change_percent,
        volume_24h: series.volume.get(last_idx).copied().flatten().unwrap_or(0.0),
        high_24h: high_24h.unwrap_or(price),
        low_24h: low_24h.unwrap_or(price),
        market_cap: 0.0,
        timestamp,
    })
}
