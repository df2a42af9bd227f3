//! Data source traits
//!
//! Agents and the gateway depend on these traits only, so the live HTTP
//! clients and the in-process mock are interchangeable.

use super::error::MarketResult;
use super::types::{BtcQuote, SiteStatus};
use async_trait::async_trait;
use optera_kernel::{AllocationVector, InventorySpec, PriceSnapshot};

/// Site market data and machine control.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Price history, most recent first.
    async fn prices(&self) -> MarketResult<Vec<PriceSnapshot>>;

    async fn inventory(&self) -> MarketResult<InventorySpec>;

    async fn site_status(&self) -> MarketResult<SiteStatus>;

    /// Deploy `allocation` to the site; returns the upstream response body.
    async fn update_allocation(
        &self,
        allocation: &AllocationVector,
    ) -> MarketResult<serde_json::Value>;
}

/// Bitcoin quotes. Implementations never fail; they degrade to stale or
/// fixed data instead.
#[async_trait]
pub trait BtcPriceSource: Send + Sync {
    async fn quote(&self) -> BtcQuote;
}
