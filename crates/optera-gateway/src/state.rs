//! Shared application state for the gateway handlers

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use optera_foundation::llm::{LLMClient, LLMProvider, provider_from_config};
use optera_foundation::market::{
    BtcPriceSource, HttpMarketClient, MarketDataSource, MockMarketSource, StaticBtcSource,
    YahooBtcClient,
};
use optera_foundation::{AgentStatusBoard, AllocationAgent, ChatAssistant, TtlCache};
use std::sync::Arc;
use tracing::info;

/// State shared across all request handlers
pub struct AppState {
    pub market: Arc<dyn MarketDataSource>,
    pub btc: Arc<dyn BtcPriceSource>,
    pub agent: Arc<AllocationAgent>,
    pub chat: Arc<ChatAssistant>,
    pub status_board: AgentStatusBoard,
    /// Applied to evaluate requests without a power limit
    pub default_power_limit_watts: f64,
}

impl AppState {
    /// Wire the agents around the given collaborators.
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        btc: Arc<dyn BtcPriceSource>,
        provider: Arc<dyn LLMProvider>,
        config: &GatewayConfig,
    ) -> Self {
        let llm = LLMClient::new(provider).with_max_tokens(config.llm.max_tokens);
        let settings = &config.allocation;

        let agent = Arc::new(
            AllocationAgent::new(market.clone(), llm.clone())
                .with_default_power_limit(settings.default_power_limit_watts),
        );
        let chat = Arc::new(ChatAssistant::new(
            market.clone(),
            btc.clone(),
            agent.clone(),
            llm,
            config.chat.clone(),
        ));
        let status_board = AgentStatusBoard::new(
            agent.clone(),
            chat.clone(),
            market.clone(),
            btc.clone(),
            Arc::new(TtlCache::new(settings.output_cache_ttl())),
        )
        .with_inference_priority(settings.status_inference_priority);

        Self {
            market,
            btc,
            agent,
            chat,
            status_board,
            default_power_limit_watts: settings.default_power_limit_watts,
        }
    }

    /// Build live or demo collaborators as `config` asks.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let (market, btc): (Arc<dyn MarketDataSource>, Arc<dyn BtcPriceSource>) =
            if config.mock_data {
                info!("serving the in-process demo site");
                (
                    Arc::new(MockMarketSource::demo()),
                    Arc::new(StaticBtcSource::demo()),
                )
            } else {
                (
                    Arc::new(HttpMarketClient::new(config.market.clone())?),
                    Arc::new(YahooBtcClient::new(config.btc.clone())?),
                )
            };

        let provider = provider_from_config(config.llm.clone())
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        info!(
            market = market.name(),
            llm = provider.name(),
            model = %config.llm.model,
            "gateway state assembled"
        );

        Ok(Self::new(market, btc, provider, config))
    }
}
