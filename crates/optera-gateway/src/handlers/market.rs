//! Site and market data endpoints
//!
//! GET /status              - site status, current prices and BTC quote
//! GET /btc                 - BTC quote
//! GET /market-intelligence - model analysis of current conditions

use axum::{Json, extract::State};
use optera_foundation::allocation::MarketAnalysis;
use optera_foundation::market::{BtcQuote, SiteStatus};
use optera_kernel::PriceSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub site_status: SiteStatus,
    pub current_prices: Vec<PriceSnapshot>,
    pub btc_data: BtcQuote,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarketIntelligence {
    #[serde(flatten)]
    pub analysis: MarketAnalysis,
    pub btc_data: BtcQuote,
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> GatewayResult<Json<StatusResponse>> {
    let (site_status, current_prices) =
        tokio::try_join!(state.market.site_status(), state.market.prices())?;
    let btc_data = state.btc.quote().await;

    Ok(Json(StatusResponse {
        site_status,
        current_prices,
        btc_data,
    }))
}

/// GET /btc
///
/// Never fails: the source falls back to its last known or fixed quote.
pub async fn btc(State(state): State<Arc<AppState>>) -> Json<BtcQuote> {
    Json(state.btc.quote().await)
}

/// GET /market-intelligence
pub async fn market_intelligence(
    State(state): State<Arc<AppState>>,
) -> GatewayResult<Json<MarketIntelligence>> {
    let (analysis, btc_data) =
        tokio::join!(state.agent.analyze_market_conditions(), state.btc.quote());

    Ok(Json(MarketIntelligence {
        analysis: analysis?,
        btc_data,
    }))
}

pub fn market_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;
    axum::Router::new()
        .route("/status", get(status))
        .route("/btc", get(btc))
        .route("/market-intelligence", get(market_intelligence))
}
