//! Allocation endpoints
//!
//! POST /allocate  - run the full advisory workflow
//! POST /evaluate  - account a caller-supplied allocation, no model involved
//! POST /deploy    - push an allocation to the site

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use optera_foundation::{AllocationOutcome, AllocationRequest};
use optera_kernel::accounting::{evaluate, resolve_power_limit, scale_annotation};
use optera_kernel::{AllocationReport, AllocationVector, InventorySpec, PriceSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

/// Request body for POST /evaluate
///
/// Inventory and prices are fetched from the site when omitted.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub allocation: AllocationVector,
    #[serde(default)]
    pub inventory: Option<InventorySpec>,
    #[serde(default)]
    pub prices: Option<Vec<PriceSnapshot>>,
    #[serde(default)]
    pub power_limit: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub report: AllocationReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployResponse {
    pub status: String,
    pub result: Value,
}

fn validate_priority(priority: f64) -> GatewayResult<()> {
    if (0.0..=1.0).contains(&priority) {
        Ok(())
    } else {
        Err(GatewayError::InvalidRequest(format!(
            "inference_priority must be between 0 and 1, got {priority}"
        )))
    }
}

/// POST /allocate
pub async fn allocate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> GatewayResult<Json<AllocationOutcome>> {
    let Json(request) = payload?;
    validate_priority(request.inference_priority)?;

    let outcome = state.agent.optimize(&request).await?;
    Ok(Json(outcome))
}

/// POST /evaluate
pub async fn evaluate_allocation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> GatewayResult<Json<EvaluateResponse>> {
    let Json(request) = payload?;

    let inventory = match request.inventory {
        Some(inventory) => inventory,
        None => state.market.inventory().await?,
    };
    let prices = match request.prices {
        Some(prices) => prices,
        None => state.market.prices().await?,
    };
    let power_limit = resolve_power_limit(request.power_limit, state.default_power_limit_watts);

    let report = evaluate(&request.allocation, &inventory, &prices, Some(power_limit));
    let note = (report.scale_factor < 1.0).then(|| scale_annotation(report.scale_factor));

    Ok(Json(EvaluateResponse { report, note }))
}

/// POST /deploy
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AllocationVector>, JsonRejection>,
) -> GatewayResult<Json<DeployResponse>> {
    let Json(allocation) = payload?;

    let result = state.market.update_allocation(&allocation).await?;
    info!(%allocation, source = state.market.name(), "allocation deployed");

    Ok(Json(DeployResponse {
        status: "deployed".to_string(),
        result,
    }))
}

pub fn allocation_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::post;
    axum::Router::new()
        .route("/allocate", post(allocate))
        .route("/evaluate", post(evaluate_allocation))
        .route("/deploy", post(deploy))
}
