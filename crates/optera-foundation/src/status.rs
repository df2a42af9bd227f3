//! One-line status per site collaborator, for the dashboard feed.
//!
//! The allocation line runs a full optimization, so it is cached for the
//! board's TTL; the other lines are computed on every call.

use crate::allocation::{AllocationAgent, AllocationRequest};
use crate::cache::TtlCache;
use crate::chat::ChatAssistant;
use crate::market::{BtcPriceSource, BtcQuote, MarketDataSource, MarketError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ALLOCATION_AGENT: &str = "AllocationAgent";
pub const CHAT_ASSISTANT: &str = "ChatAssistant";
pub const MARKET_CLIENT: &str = "MarketClient";
pub const BTC_CLIENT: &str = "BtcClient";

/// Inference priority of the status-board optimization run.
pub const DEFAULT_STATUS_INFERENCE_PRIORITY: f64 = 0.7;

const REASONING_PREVIEW_CHARS: usize = 200;
const ERROR_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Active,
    Monitoring,
    Ready,
    Syncing,
    Updating,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub timestamp: String,
    pub output: String,
    pub status: AgentState,
}

impl AgentOutput {
    fn now(output: impl Into<String>, status: AgentState) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            output: output.into(),
            status,
        }
    }
}

pub struct AgentStatusBoard {
    agent: Arc<AllocationAgent>,
    chat: Arc<ChatAssistant>,
    market: Arc<dyn MarketDataSource>,
    btc: Arc<dyn BtcPriceSource>,
    cache: Arc<TtlCache<&'static str, AgentOutput>>,
    inference_priority: f64,
}

impl AgentStatusBoard {
    pub fn new(
        agent: Arc<AllocationAgent>,
        chat: Arc<ChatAssistant>,
        market: Arc<dyn MarketDataSource>,
        btc: Arc<dyn BtcPriceSource>,
        cache: Arc<TtlCache<&'static str, AgentOutput>>,
    ) -> Self {
        Self {
            agent,
            chat,
            market,
            btc,
            cache,
            inference_priority: DEFAULT_STATUS_INFERENCE_PRIORITY,
        }
    }

    pub fn with_inference_priority(mut self, priority: f64) -> Self {
        self.inference_priority = priority;
        self
    }

    /// All four status lines keyed by collaborator name.
    pub async fn outputs(&self) -> BTreeMap<String, AgentOutput> {
        let (allocation, market, btc) =
            tokio::join!(self.allocation_output(), self.market_output(), self.btc_output());

        BTreeMap::from([
            (ALLOCATION_AGENT.to_string(), allocation),
            (CHAT_ASSISTANT.to_string(), self.chat_output()),
            (MARKET_CLIENT.to_string(), market),
            (BTC_CLIENT.to_string(), btc),
        ])
    }

    async fn allocation_output(&self) -> AgentOutput {
        let request = AllocationRequest::default().with_inference_priority(self.inference_priority);
        self.cache.purge_expired();
        self.cache
            .get_or_insert_with(ALLOCATION_AGENT, || async {
                match self.agent.optimize(&request).await {
                    Ok(outcome) => AgentOutput::now(
                        format!(
                            "Optimizing allocation: {}...",
                            preview(&outcome.reasoning, REASONING_PREVIEW_CHARS)
                        ),
                        AgentState::Active,
                    ),
                    Err(_) => AgentOutput::now(
                        "Analyzing market conditions and power utilization patterns...",
                        AgentState::Monitoring,
                    ),
                }
            })
            .await
    }

    fn chat_output(&self) -> AgentOutput {
        AgentOutput::now(
            format!(
                "System health: operational. Processed {} recent conversations.",
                self.chat.conversation_count()
            ),
            AgentState::Ready,
        )
    }

    async fn market_output(&self) -> AgentOutput {
        let fetched = tokio::try_join!(self.market.site_status(), self.market.prices());
        let line = fetched.and_then(|(status, prices)| {
            let latest = prices.first().ok_or_else(|| MarketError::Decode {
                endpoint: "GET /prices".to_string(),
                message: "no price snapshots".to_string(),
            })?;
            Ok(format!(
                "Live sync: {:.0}W used, latest price: ${:.3}/kWh",
                status.total_power_used, latest.energy_price
            ))
        });

        match line {
            Ok(line) => AgentOutput::now(line, AgentState::Syncing),
            Err(e) => AgentOutput::now(
                format!("Connection issue: {}...", preview(&e.to_string(), ERROR_PREVIEW_CHARS)),
                AgentState::Error,
            ),
        }
    }

    async fn btc_output(&self) -> AgentOutput {
        let quote = self.btc.quote().await;
        AgentOutput::now(btc_line(&quote), AgentState::Updating)
    }
}

fn btc_line(quote: &BtcQuote) -> String {
    format!(
        "BTC: ${} ({:+.1}%) - Market data refreshed",
        group_thousands(quote.price),
        quote.change_percent
    )
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// `111304.023` → `"111,304"`.
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}
