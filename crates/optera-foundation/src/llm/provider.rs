//! LLM Provider Trait
//!
//! Every backend (Anthropic, the offline stand-in, test doubles) implements
//! [`LLMProvider`]; the rest of the crate only holds `Arc<dyn LLMProvider>`.

use super::types::*;
use async_trait::async_trait;

/// LLM provider trait
///
/// # Example
///
/// ```rust,ignore
/// use optera_foundation::llm::{ChatCompletionRequest, ChatCompletionResponse, LLMProvider, LLMResult};
///
/// struct EchoProvider;
///
/// #[async_trait::async_trait]
/// impl LLMProvider for EchoProvider {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn chat(&self, request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
///         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(ChatCompletionResponse::text("echo", last))
///     }
/// }
/// ```
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty
    fn default_model(&self) -> &str {
        ""
    }

    /// Whether the provider can answer at all; `false` for the offline provider
    fn is_configured(&self) -> bool {
        true
    }

    /// Send a chat completion request
    async fn chat(&self, request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse>;
}
