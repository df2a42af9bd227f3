//! Market price snapshots

use serde::{Deserialize, Serialize};

/// One timestamped record of market prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Revenue per unit of hashrate.
    #[serde(default)]
    pub hash_price: f64,
    /// Revenue per unit of token throughput.
    #[serde(default)]
    pub token_price: f64,
    /// Cost per watt of power usage.
    #[serde(default)]
    pub energy_price: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

impl PriceSnapshot {
    pub fn new(hash_price: f64, token_price: f64, energy_price: f64) -> Self {
        Self {
            hash_price,
            token_price,
            energy_price,
            timestamp: String::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// The most recent snapshot of a most-recent-first sequence.
pub fn latest(prices: &[PriceSnapshot]) -> Option<&PriceSnapshot> {
    prices.first()
}
