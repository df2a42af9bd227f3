//! Hardware inventory characteristics
//!
//! [`InventorySpec`] stores one [`UnitSpec`] per pool. On the wire it uses the
//! nested shape served by the site API:
//!
//! ```json
//! {
//!   "miners":    { "air": { "power": 3500, "hashrate": 1000 }, "hydro": { ... }, "immersion": { ... } },
//!   "inference": { "gpu": { "power": 5000, "tokens": 1000 }, "asic": { ... } }
//! }
//! ```
//!
//! Any missing category, pool or field reads as zero.

use crate::pool::ResourcePool;
use serde::{Deserialize, Serialize};

/// Per-unit characteristics of one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Power draw of a single unit, in watts.
    pub power_draw_watts: f64,
    /// Hashrate (mining pools) or token rate (inference pools) of a single unit.
    pub throughput: f64,
}

impl UnitSpec {
    pub const fn new(power_draw_watts: f64, throughput: f64) -> Self {
        Self {
            power_draw_watts,
            throughput,
        }
    }
}

/// Power and throughput characteristics for all five pools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "InventoryWire", into = "InventoryWire")]
pub struct InventorySpec {
    units: [UnitSpec; 5],
}

impl InventorySpec {
    /// An inventory where every pool draws no power and produces nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, pool: ResourcePool, spec: UnitSpec) -> Self {
        self.set_unit(pool, spec);
        self
    }

    pub fn set_unit(&mut self, pool: ResourcePool, spec: UnitSpec) {
        self.units[pool.index()] = spec;
    }

    pub fn unit(&self, pool: ResourcePool) -> UnitSpec {
        self.units[pool.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourcePool, UnitSpec)> + '_ {
        ResourcePool::ALL
            .into_iter()
            .map(move |pool| (pool, self.unit(pool)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InventoryWire {
    #[serde(default)]
    miners: MinersWire,
    #[serde(default)]
    inference: InferenceWire,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MinersWire {
    #[serde(default)]
    air: MinerWire,
    #[serde(default)]
    hydro: MinerWire,
    #[serde(default)]
    immersion: MinerWire,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InferenceWire {
    #[serde(default)]
    gpu: ComputeWire,
    #[serde(default)]
    asic: ComputeWire,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct MinerWire {
    #[serde(default)]
    power: f64,
    #[serde(default)]
    hashrate: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ComputeWire {
    #[serde(default)]
    power: f64,
    #[serde(default)]
    tokens: f64,
}

impl From<MinerWire> for UnitSpec {
    fn from(w: MinerWire) -> Self {
        UnitSpec::new(w.power, w.hashrate)
    }
}

impl From<ComputeWire> for UnitSpec {
    fn from(w: ComputeWire) -> Self {
        UnitSpec::new(w.power, w.tokens)
    }
}

impl From<InventoryWire> for InventorySpec {
    fn from(w: InventoryWire) -> Self {
        InventorySpec::new()
            .with_unit(ResourcePool::AirMiners, w.miners.air.into())
            .with_unit(ResourcePool::HydroMiners, w.miners.hydro.into())
            .with_unit(ResourcePool::ImmersionMiners, w.miners.immersion.into())
            .with_unit(ResourcePool::GpuCompute, w.inference.gpu.into())
            .with_unit(ResourcePool::AsicCompute, w.inference.asic.into())
    }
}

impl From<InventorySpec> for InventoryWire {
    fn from(spec: InventorySpec) -> Self {
        let miner = |pool| {
            let u = spec.unit(pool);
            MinerWire {
                power: u.power_draw_watts,
                hashrate: u.throughput,
            }
        };
        let compute = |pool| {
            let u = spec.unit(pool);
            ComputeWire {
                power: u.power_draw_watts,
                tokens: u.throughput,
            }
        };
        InventoryWire {
            miners: MinersWire {
                air: miner(ResourcePool::AirMiners),
                hydro: miner(ResourcePool::HydroMiners),
                immersion: miner(ResourcePool::ImmersionMiners),
            },
            inference: InferenceWire {
                gpu: compute(ResourcePool::GpuCompute),
                asic: compute(ResourcePool::AsicCompute),
            },
        }
    }
}
