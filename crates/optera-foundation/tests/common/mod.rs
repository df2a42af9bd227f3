//! Shared helpers for `optera-foundation` integration tests.
//!
//! Declared with `mod common;` inside each test file that needs it.

pub mod mock_provider;

use optera_foundation::llm::LLMClient;
use optera_foundation::market::{MockMarketSource, StaticBtcSource};
use optera_foundation::AllocationAgent;
use std::sync::Arc;

use mock_provider::MockLLMProvider;

/// Demo market, static BTC quote and an agent wired to `provider`.
pub struct Harness {
    pub market: Arc<MockMarketSource>,
    pub btc: Arc<StaticBtcSource>,
    pub provider: Arc<MockLLMProvider>,
    pub agent: Arc<AllocationAgent>,
}

impl Harness {
    pub fn new(provider: MockLLMProvider) -> Self {
        let market = Arc::new(MockMarketSource::demo());
        let btc = Arc::new(StaticBtcSource::demo());
        let provider = Arc::new(provider);
        let agent = Arc::new(AllocationAgent::new(market.clone(), llm(&provider)));
        Self {
            market,
            btc,
            provider,
            agent,
        }
    }
}

pub fn llm(provider: &Arc<MockLLMProvider>) -> LLMClient {
    LLMClient::new(provider.clone())
}
