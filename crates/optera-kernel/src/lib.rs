//! `optera-kernel` — deterministic accounting core for a hybrid mining /
//! inference compute site.
//!
//! Everything in this crate is pure and synchronous: callers hand in an
//! [`AllocationVector`], an [`InventorySpec`] and a price history, and get back
//! power, revenue and cost figures. No I/O, no shared state.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`pool`] | [`ResourcePool`] identifiers and their [`PoolCategory`] |
//! | [`inventory`] | Per-pool power draw and throughput |
//! | [`pricing`] | [`PriceSnapshot`] market records |
//! | [`allocation`] | [`AllocationVector`] unit counts |
//! | [`accounting`] | Power usage, feasibility scaling, revenue, cost, efficiency |
//!
//! # Example
//!
//! ```rust
//! use optera_kernel::{
//!     AllocationVector, InventorySpec, PriceSnapshot, ResourcePool, UnitSpec, accounting,
//! };
//!
//! let inventory = InventorySpec::new()
//!     .with_unit(ResourcePool::HydroMiners, UnitSpec::new(1500.0, 0.02))
//!     .with_unit(ResourcePool::GpuCompute, UnitSpec::new(2000.0, 0.5));
//! let allocation = AllocationVector::zero()
//!     .with(ResourcePool::HydroMiners, 300)
//!     .with(ResourcePool::GpuCompute, 100);
//! let prices = [PriceSnapshot::new(1.20, 3.56, 1.337)];
//!
//! let report = accounting::evaluate(&allocation, &inventory, &prices, None);
//! assert_eq!(report.power_usage_watts, 650_000.0);
//! assert_eq!(report.scale_factor, 1.0);
//! ```

pub mod accounting;
pub mod allocation;
pub mod error;
pub mod inventory;
pub mod pool;
pub mod pricing;

pub use accounting::{AllocationReport, RevenueBreakdown, ScaleOutcome};
pub use allocation::AllocationVector;
pub use error::KernelError;
pub use inventory::{InventorySpec, UnitSpec};
pub use pool::{PoolCategory, ResourcePool};
pub use pricing::PriceSnapshot;
