//! Resource pool identifiers

use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Revenue category of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolCategory {
    /// Earns `hash_price` per unit of hashrate.
    Mining,
    /// Earns `token_price` per unit of token throughput.
    Inference,
}

/// One of the five hardware allocation categories of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePool {
    AirMiners,
    HydroMiners,
    ImmersionMiners,
    GpuCompute,
    AsicCompute,
}

impl ResourcePool {
    /// All pools in wire order.
    pub const ALL: [ResourcePool; 5] = [
        ResourcePool::AirMiners,
        ResourcePool::HydroMiners,
        ResourcePool::ImmersionMiners,
        ResourcePool::GpuCompute,
        ResourcePool::AsicCompute,
    ];

    pub const fn category(self) -> PoolCategory {
        match self {
            ResourcePool::AirMiners | ResourcePool::HydroMiners | ResourcePool::ImmersionMiners => {
                PoolCategory::Mining
            }
            ResourcePool::GpuCompute | ResourcePool::AsicCompute => PoolCategory::Inference,
        }
    }

    pub const fn is_mining(self) -> bool {
        matches!(self.category(), PoolCategory::Mining)
    }

    /// Wire name, e.g. `"hydro_miners"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourcePool::AirMiners => "air_miners",
            ResourcePool::HydroMiners => "hydro_miners",
            ResourcePool::ImmersionMiners => "immersion_miners",
            ResourcePool::GpuCompute => "gpu_compute",
            ResourcePool::AsicCompute => "asic_compute",
        }
    }

    /// Position in [`ResourcePool::ALL`]; used as an array index.
    pub(crate) const fn index(self) -> usize {
        match self {
            ResourcePool::AirMiners => 0,
            ResourcePool::HydroMiners => 1,
            ResourcePool::ImmersionMiners => 2,
            ResourcePool::GpuCompute => 3,
            ResourcePool::AsicCompute => 4,
        }
    }
}

impl fmt::Display for ResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourcePool {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourcePool::ALL
            .into_iter()
            .find(|pool| pool.as_str() == s)
            .ok_or_else(|| KernelError::UnknownPool(s.to_string()))
    }
}
