//! Site Q&A assistant
//!
//! Answers operator questions from live site data, keeps a bounded history,
//! and produces a structured system summary for dashboards.

use super::history::{ConversationEntry, ConversationHistory};
use crate::allocation::AllocationAgent;
use crate::error::AllocationResult;
use crate::llm::LLMClient;
use crate::market::{BtcPriceSource, BtcQuote, MarketDataSource, SiteStatus};
use chrono::Utc;
use optera_kernel::PriceSnapshot;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{instrument, warn};

pub const CHAT_TEMPERATURE: f32 = 0.3;

const CHAT_SYSTEM_PROMPT: &str = "You are the site operations assistant for a combined mining and AI \
inference facility. Be extremely concise: one or two short sentences. Quote specific numbers from the data. \
Do not explain unless asked.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a systems analyst. Produce a structured summary of the site's resource allocation system.";

/// Tunables for [`ChatAssistant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Exchanges kept in history
    pub max_history: usize,
    /// Most recent exchanges included in each prompt
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history: ConversationHistory::DEFAULT_MAX_ENTRIES,
            history_window: 2,
        }
    }
}

/// Live site data gathered for a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemContext {
    pub timestamp: String,
    pub site_status: Option<SiteStatus>,
    pub current_prices: Option<Vec<PriceSnapshot>>,
    pub btc_data: BtcQuote,
    /// `operational`, or the connection error
    pub system_health: String,
}

/// Answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used: Option<Value>,
    pub error: bool,
}

/// Structured summary plus the model's raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub summary: Value,
    pub raw_response: String,
}

pub struct ChatAssistant {
    market: Arc<dyn MarketDataSource>,
    btc: Arc<dyn BtcPriceSource>,
    agent: Arc<AllocationAgent>,
    llm: LLMClient,
    history: Mutex<ConversationHistory>,
    history_window: usize,
}

impl ChatAssistant {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        btc: Arc<dyn BtcPriceSource>,
        agent: Arc<AllocationAgent>,
        llm: LLMClient,
        config: ChatConfig,
    ) -> Self {
        Self {
            market,
            btc,
            agent,
            llm,
            history: Mutex::new(ConversationHistory::with_max_entries(config.max_history)),
            history_window: config.history_window,
        }
    }

    /// Answer `message`. Failures are reported in the reply, never as `Err`.
    #[instrument(skip(self, context), fields(len = message.len()))]
    pub async fn respond(&self, message: &str, context: Option<Value>) -> ChatReply {
        let system_context = self.system_context().await;
        let context_value = serde_json::to_value(&system_context).unwrap_or(Value::Null);
        let prompt = self.build_prompt(message, &system_context, context.as_ref());

        let request = self
            .llm
            .request()
            .system(CHAT_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(CHAT_TEMPERATURE);

        match self.llm.send(request).await {
            Ok(response) => {
                let timestamp = Utc::now().to_rfc3339();
                self.history.lock().push(ConversationEntry {
                    timestamp: timestamp.clone(),
                    user_message: message.to_string(),
                    ai_response: response.clone(),
                    system_context: context_value.clone(),
                });
                ChatReply {
                    response,
                    timestamp,
                    context_used: Some(context_value),
                    error: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "chat reply failed");
                ChatReply {
                    response: format!("I'm sorry, I encountered an error: {e}"),
                    timestamp: Utc::now().to_rfc3339(),
                    context_used: None,
                    error: true,
                }
            }
        }
    }

    /// Ask the model for a JSON summary of the site.
    ///
    /// The first `{...}` span of the reply becomes `summary`; if there is none
    /// the raw text is wrapped as `{"status": "generated", "content": ...}`.
    #[instrument(skip(self))]
    pub async fn system_summary(&self) -> AllocationResult<SystemSummary> {
        let system_context = self.system_context().await;
        let market_conditions = match self.agent.analyze_market_conditions().await {
            Ok(analysis) => serde_json::to_value(analysis).unwrap_or(Value::Null),
            Err(e) => Value::String(format!("analysis_error: {e}")),
        };

        let mut data = serde_json::to_value(&system_context).unwrap_or_else(|_| json!({}));
        data["market_conditions"] = market_conditions;

        let prompt = format!(
            "Summarize the current system state.\n\nSYSTEM DATA:\n{}\n\n\
             Cover:\n\
             1. Overall system health\n\
             2. Resource allocation efficiency\n\
             3. Impact of Bitcoin market conditions\n\
             4. Alerts or recommendations\n\
             5. Recent performance highlights\n\n\
             Format the answer as JSON with clear categories.",
            serde_json::to_string_pretty(&data).unwrap_or_default()
        );

        let request = self
            .llm
            .request()
            .system(SUMMARY_SYSTEM_PROMPT)
            .user(prompt)
            .temperature(CHAT_TEMPERATURE);
        let raw = self.llm.send(request).await?;

        Ok(SystemSummary {
            summary: summary_from_reply(&raw),
            raw_response: raw,
        })
    }

    /// Up to `limit` recent exchanges, oldest first.
    pub fn history(&self, limit: usize) -> Vec<ConversationEntry> {
        self.history.lock().recent(limit)
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn conversation_count(&self) -> usize {
        self.history.lock().len()
    }

    async fn system_context(&self) -> SystemContext {
        let site = tokio::try_join!(self.market.site_status(), self.market.prices());
        let btc_data = self.btc.quote().await;

        let (site_status, current_prices, system_health) = match site {
            Ok((status, prices)) => (Some(status), Some(prices), "operational".to_string()),
            Err(e) => (None, None, format!("market_connection_error: {e}")),
        };

        SystemContext {
            timestamp: Utc::now().to_rfc3339(),
            site_status,
            current_prices,
            btc_data,
            system_health,
        }
    }

    fn build_prompt(&self, message: &str, ctx: &SystemContext, extra: Option<&Value>) -> String {
        let status = ctx.site_status.clone().unwrap_or_default();
        let allocation = status.allocation();
        let key_metrics = json!({
            "power_used": status.total_power_used,
            "revenue": status.total_revenue,
            "units": allocation,
            "btc_price": ctx.btc_data.price,
            "system_health": ctx.system_health,
        });
        let recent = self.history.lock().transcript(self.history_window);

        let mut prompt = format!("CURRENT STATE: {key_metrics}\nRECENT CHAT: {recent}\n");
        if let Some(extra) = extra {
            prompt.push_str(&format!("ADDITIONAL CONTEXT: {extra}\n"));
        }
        prompt.push_str(&format!(
            "\nAnswer in one or two short sentences using specific numbers.\n\nUser: {message}\n"
        ));
        prompt
    }
}

fn summary_from_reply(raw: &str) -> Value {
    let span = raw
        .find('{')
        .zip(raw.rfind('}'))
        .filter(|(start, end)| end > start)
        .map(|(start, end)| &raw[start..=end]);

    match span {
        Some(json) => serde_json::from_str(json)
            .unwrap_or_else(|_| json!({"status": "text", "content": raw})),
        None => json!({"status": "generated", "content": raw}),
    }
}
