//! Mock LLM provider for `optera-foundation` integration tests.
//!
//! Replies are queued at build time and returned in FIFO order; once the
//! queue is empty every call returns `"mock response"`. Every request is
//! recorded for later inspection.
//!
//! ```rust,ignore
//! let mock = MockLLMProvider::builder()
//!     .respond_with("analysis")
//!     .respond_with_error(LLMError::Timeout("slow".into()))
//!     .build();
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use optera_foundation::llm::{
    ChatCompletionRequest, ChatCompletionResponse, LLMError, LLMProvider, LLMResult,
};

pub const DEFAULT_REPLY: &str = "mock response";

#[derive(Default)]
struct MockState {
    chat_calls: Vec<ChatCompletionRequest>,
    chat_responses: VecDeque<LLMResult<ChatCompletionResponse>>,
}

pub struct MockLLMProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockLLMProvider {
    pub fn builder() -> MockLLMProviderBuilder {
        MockLLMProviderBuilder::default()
    }

    pub fn chat_call_count(&self) -> usize {
        self.state.lock().unwrap().chat_calls.len()
    }

    pub fn chat_calls(&self) -> Vec<ChatCompletionRequest> {
        self.state.lock().unwrap().chat_calls.clone()
    }

    pub fn last_chat_request(&self) -> Option<ChatCompletionRequest> {
        self.state.lock().unwrap().chat_calls.last().cloned()
    }

    /// Queue one more reply after construction.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .chat_responses
            .push_back(Ok(ChatCompletionResponse::text("mock-model", text)));
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn chat(&self, request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
        let mut state = self.state.lock().unwrap();
        state.chat_calls.push(request);
        state
            .chat_responses
            .pop_front()
            .unwrap_or_else(|| Ok(ChatCompletionResponse::text("mock-model", DEFAULT_REPLY)))
    }
}

#[derive(Default)]
pub struct MockLLMProviderBuilder {
    responses: VecDeque<LLMResult<ChatCompletionResponse>>,
}

impl MockLLMProviderBuilder {
    pub fn respond_with(mut self, text: impl Into<String>) -> Self {
        self.responses
            .push_back(Ok(ChatCompletionResponse::text("mock-model", text)));
        self
    }

    pub fn respond_with_error(mut self, error: LLMError) -> Self {
        self.responses.push_back(Err(error));
        self
    }

    pub fn build(self) -> MockLLMProvider {
        MockLLMProvider {
            state: Arc::new(Mutex::new(MockState {
                chat_calls: Vec::new(),
                chat_responses: self.responses,
            })),
        }
    }
}
