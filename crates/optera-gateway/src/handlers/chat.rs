//! Operator chat endpoints
//!
//! POST   /chat          - ask the assistant a question
//! GET    /chat/summary  - structured system summary
//! GET    /chat/history  - recent exchanges, `?limit=10`
//! DELETE /chat/history  - forget the conversation

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
};
use optera_foundation::chat::{ChatReply, ConversationEntry, SystemSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Request body for POST /chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Extra caller context passed to the model verbatim
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<ConversationEntry>,
}

/// POST /chat
///
/// Model failures come back as a 200 reply with `error: true`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> GatewayResult<Json<ChatReply>> {
    let Json(request) = payload?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    Ok(Json(state.chat.respond(message, request.context).await))
}

/// GET /chat/summary
pub async fn summary(State(state): State<Arc<AppState>>) -> GatewayResult<Json<SystemSummary>> {
    Ok(Json(state.chat.system_summary().await?))
}

/// GET /chat/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> GatewayResult<Json<HistoryResponse>> {
    let Query(query) = query?;
    Ok(Json(HistoryResponse {
        history: state.chat.history(query.limit),
    }))
}

/// DELETE /chat/history
pub async fn clear_history(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.chat.clear_history();
    tracing::info!("chat history cleared");
    Json(json!({ "status": "cleared" }))
}

pub fn chat_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::{get, post};
    axum::Router::new()
        .route("/chat", post(chat))
        .route("/chat/summary", get(summary))
        .route("/chat/history", get(history).delete(clear_history))
}
