//! LLM Client
//!
//! Thin convenience layer over a shared provider: fills in the default model
//! and exposes single-shot `ask_with_system` calls.

use super::provider::LLMProvider;
use super::types::*;
use std::sync::Arc;
use tracing::debug;

/// LLM client
#[derive(Clone)]
pub struct LLMClient {
    provider: Arc<dyn LLMProvider>,
    default_max_tokens: Option<u32>,
}

impl LLMClient {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            default_max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.default_max_tokens = Some(tokens);
        self
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Start a request against the provider's default model.
    pub fn request(&self) -> ChatCompletionRequest {
        let req = ChatCompletionRequest::new(self.provider.default_model());
        match self.default_max_tokens {
            Some(tokens) => req.max_tokens(tokens),
            None => req,
        }
    }

    /// Send a prepared request and return the reply text.
    pub async fn send(&self, request: ChatCompletionRequest) -> LLMResult<String> {
        debug!(
            provider = self.provider.name(),
            messages = request.messages.len(),
            "sending chat request"
        );
        let response = self.provider.chat(request).await?;
        if response.content.trim().is_empty() {
            return Err(LLMError::Other("No content in response".to_string()));
        }
        Ok(response.content)
    }

    /// One system prompt, one user message.
    pub async fn ask_with_system(
        &self,
        system: impl Into<String>,
        question: impl Into<String>,
        temperature: f32,
    ) -> LLMResult<String> {
        let request = self
            .request()
            .system(system)
            .user(question)
            .temperature(temperature);
        self.send(request).await
    }
}
