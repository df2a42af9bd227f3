//! Shared helpers for `optera-gateway` integration tests.

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use optera_foundation::llm::{
    ChatCompletionRequest, ChatCompletionResponse, LLMProvider, LLMResult, OfflineProvider,
};
use optera_foundation::market::{MockMarketSource, StaticBtcSource};
use optera_gateway::{AppState, GatewayConfig, build_router};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Replies with queued texts in order, then with `"scripted reply"`.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _request: ChatCompletionRequest) -> LLMResult<ChatCompletionResponse> {
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "scripted reply".to_string());
        Ok(ChatCompletionResponse::text("scripted-model", text))
    }
}

pub struct TestApp {
    pub router: Router,
    pub market: Arc<MockMarketSource>,
}

impl TestApp {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        let market = Arc::new(MockMarketSource::demo());
        let state = AppState::new(
            market.clone(),
            Arc::new(StaticBtcSource::demo()),
            provider,
            &GatewayConfig::default(),
        );
        Self {
            router: build_router(Arc::new(state)),
            market,
        }
    }

    /// Demo site with no language model configured.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineProvider::new()))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
