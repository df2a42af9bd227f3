//! Provider used when no API key is configured.
//!
//! Every call fails with [`LLMError::NotConfigured`], which callers treat like
//! any other model failure (fallback allocation, apologetic chat reply).

use super::provider::LLMProvider;
use super::types::*;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LLMProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn chat(&self, _request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
        Err(LLMError::NotConfigured(
            "no API key set for the language model".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_not_configured() {
        let provider = OfflineProvider::new();
        assert!(!provider.is_configured());
        let err = provider
            .chat(ChatCompletionRequest::new("").user("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::NotConfigured(_)));
    }
}
