//! In-process market data seeded with the site's demo values.

use super::error::{MarketError, MarketResult};
use super::source::{BtcPriceSource, MarketDataSource};
use super::types::{BtcQuote, SiteStatus};
use async_trait::async_trait;
use optera_kernel::{AllocationVector, InventorySpec, PriceSnapshot, ResourcePool, UnitSpec};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Deterministic [`MarketDataSource`] for demos and tests.
///
/// Deployments update the reported site status. [`set_available`] turns
/// every call into an upstream error.
///
/// [`set_available`]: MockMarketSource::set_available
pub struct MockMarketSource {
    prices: Vec<PriceSnapshot>,
    inventory: InventorySpec,
    status: RwLock<SiteStatus>,
    available: AtomicBool,
}

impl MockMarketSource {
    pub fn new(prices: Vec<PriceSnapshot>, inventory: InventorySpec, status: SiteStatus) -> Self {
        Self {
            prices,
            inventory,
            status: RwLock::new(status),
            available: AtomicBool::new(true),
        }
    }

    /// The demo site: 425 kW in use across 900 deployed units.
    pub fn demo() -> Self {
        Self::new(demo_prices(), demo_inventory(), demo_site_status())
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self, endpoint: &str) -> MarketResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MarketError::Status {
                endpoint: endpoint.to_string(),
                status: 503,
                body: "mock source unavailable".to_string(),
            })
        }
    }
}

impl Default for MockMarketSource {
    fn default() -> Self {
        Self::demo()
    }
}

#[async_trait]
impl MarketDataSource for MockMarketSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn prices(&self) -> MarketResult<Vec<PriceSnapshot>> {
        self.check("GET /prices")?;
        Ok(self.prices.clone())
    }

    async fn inventory(&self) -> MarketResult<InventorySpec> {
        self.check("GET /inventory")?;
        Ok(self.inventory.clone())
    }

    async fn site_status(&self) -> MarketResult<SiteStatus> {
        self.check("GET /machines")?;
        Ok(self.status.read().clone())
    }

    async fn update_allocation(
        &self,
        allocation: &AllocationVector,
    ) -> MarketResult<serde_json::Value> {
        self.check("PUT /machines")?;
        let mut status = self.status.write();
        *status = status.clone().with_allocation(allocation);
        serde_json::to_value(&*status).map_err(|e| MarketError::Decode {
            endpoint: "PUT /machines".to_string(),
            message: e.to_string(),
        })
    }
}

/// Fixed BTC quote.
#[derive(Debug, Clone)]
pub struct StaticBtcSource(pub BtcQuote);

impl StaticBtcSource {
    pub fn demo() -> Self {
        Self(BtcQuote {
            price: 111_304.023,
            change_24h: 3_500.0,
            change_percent: 0.03,
            volume_24h: 45_200_000_000.0,
            high_24h: 112_000.0,
            low_24h: 110_500.0,
            market_cap: 2_220_000_000_000.0,
            timestamp: String::new(),
        })
    }
}

#[async_trait]
impl BtcPriceSource for StaticBtcSource {
    async fn quote(&self) -> BtcQuote {
        self.0.clone()
    }
}

pub fn demo_prices() -> Vec<PriceSnapshot> {
    vec![PriceSnapshot::new(1.20, 3.56, 1.337).with_timestamp("2025-06-21T20:00:00")]
}

pub fn demo_inventory() -> InventorySpec {
    InventorySpec::new()
        .with_unit(ResourcePool::AirMiners, UnitSpec::new(3_500.0, 1_000.0))
        .with_unit(ResourcePool::HydroMiners, UnitSpec::new(5_000.0, 5_000.0))
        .with_unit(ResourcePool::ImmersionMiners, UnitSpec::new(10_000.0, 10_000.0))
        .with_unit(ResourcePool::GpuCompute, UnitSpec::new(5_000.0, 1_000.0))
        .with_unit(ResourcePool::AsicCompute, UnitSpec::new(15_000.0, 50_000.0))
}

pub fn demo_site_status() -> SiteStatus {
    SiteStatus {
        total_power_used: 425_000.0,
        total_revenue: 582_000.0,
        total_power_cost: 75_000.0,
        ..Default::default()
    }
    .with_allocation(&AllocationVector::new(150, 200, 100, 50, 400))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deploy_updates_reported_status() {
        let source = MockMarketSource::demo();
        let target = AllocationVector::new(0, 5, 10, 30, 20);
        let body = source.update_allocation(&target).await.unwrap();
        assert_eq!(body["gpu_compute"], 30);
        assert_eq!(source.site_status().await.unwrap().allocation(), target);
    }

    #[tokio::test]
    async fn unavailable_source_fails_every_call() {
        let source = MockMarketSource::demo();
        source.set_available(false);
        assert!(source.prices().await.is_err());
        assert!(source.inventory().await.is_err());
        assert!(source.site_status().await.is_err());
        source.set_available(true);
        assert_eq!(source.prices().await.unwrap()[0].energy_price, 1.337);
    }
}
