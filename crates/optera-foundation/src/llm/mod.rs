//! Language model access
//!
//! - [`provider::LLMProvider`]: backend trait
//! - [`anthropic::AnthropicProvider`]: Messages API client
//! - [`offline::OfflineProvider`]: stand-in when no key is configured
//! - [`client::LLMClient`]: request helpers shared by the agents

pub mod anthropic;
pub mod client;
pub mod offline;
pub mod provider;
pub mod types;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use client::LLMClient;
pub use offline::OfflineProvider;
pub use provider::LLMProvider;
pub use types::*;

use std::sync::Arc;

/// Anthropic when a key is present, otherwise the offline provider.
pub fn provider_from_config(config: AnthropicConfig) -> LLMResult<Arc<dyn LLMProvider>> {
    if config.has_api_key() {
        Ok(Arc::new(AnthropicProvider::with_config(config)?))
    } else {
        tracing::warn!("no language model API key configured; running with the offline provider");
        Ok(Arc::new(OfflineProvider::new()))
    }
}
