//! Agent status feed
//!
//! GET /agents/outputs - one status line per collaborator

use axum::{Json, extract::State};
use optera_foundation::AgentOutput;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::state::AppState;

/// GET /agents/outputs
pub async fn outputs(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, AgentOutput>> {
    Json(state.status_board.outputs().await)
}

pub fn agents_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;
    axum::Router::new().route("/agents/outputs", get(outputs))
}
