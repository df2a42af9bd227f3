//! Wire types returned by the market data sources

use optera_kernel::{AllocationVector, ResourcePool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Live site telemetry as reported by the site API.
///
/// Only the totals are typed; every other field (pool counts, timestamps,
/// site identifiers) is kept verbatim in `extra` and re-emitted unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteStatus {
    #[serde(default)]
    pub total_power_used: f64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_power_cost: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteStatus {
    /// Replace the per-pool unit counts with `allocation`.
    pub fn with_allocation(mut self, allocation: &AllocationVector) -> Self {
        for (pool, units) in allocation.iter() {
            self.extra.insert(pool.as_str().to_string(), Value::from(units));
        }
        self
    }

    /// Currently deployed unit counts; pools that are missing or not numeric read as zero.
    pub fn allocation(&self) -> AllocationVector {
        let mut out = AllocationVector::zero();
        for pool in ResourcePool::ALL {
            let units = self
                .extra
                .get(pool.as_str())
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
                .map_or(0, |v| v.trunc() as u64);
            out.set(pool, units);
        }
        out
    }
}

/// Bitcoin spot quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BtcQuote {
    pub price: f64,
    pub change_24h: f64,
    pub change_percent: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub market_cap: f64,
    #[serde(default)]
    pub timestamp: String,
}

impl BtcQuote {
    /// Served when no quote has ever been fetched successfully.
    pub fn fallback() -> Self {
        Self {
            price: 95_000.0,
            change_24h: 1_250.0,
            change_percent: 1.3,
            volume_24h: 28_500_000_000.0,
            high_24h: 96_000.0,
            low_24h: 93_500.0,
            market_cap: 1_800_000_000_000.0,
            timestamp: "2025-06-21T20:00:00".to_string(),
        }
    }
}
