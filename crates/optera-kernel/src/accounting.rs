//! Power, revenue and cost accounting
//!
//! The functions here form one pipeline, exposed piecewise and as
//! [`evaluate`]:
//!
//! 1. [`compute_power_usage`] sums per-unit draw across pools.
//! 2. [`scale_to_power_limit`] shrinks an over-budget allocation by a single
//!    uniform factor, truncating every pool toward zero.
//! 3. [`compute_revenue`] prices hashrate and token throughput with the latest
//!    snapshot.
//! 4. [`estimate_cost`] prices the post-scaling power figure.
//! 5. [`efficiency_score`] folds revenue and cost into a 0–100 heuristic.
//!
//! Degenerate denominators (no prices, zero usage, zero cost) resolve to
//! fixed defaults instead of errors.

use crate::allocation::AllocationVector;
use crate::inventory::InventorySpec;
use crate::pool::PoolCategory;
use crate::pricing::{PriceSnapshot, latest};
use serde::{Deserialize, Serialize};

/// Power budget applied when the caller does not supply one.
pub const DEFAULT_POWER_LIMIT_WATTS: f64 = 1_000_000.0;

/// Efficiency score reported when there is no cost to compare against.
pub const NEUTRAL_EFFICIENCY_SCORE: f64 = 50.0;

/// Revenue/cost ratio multiplier of the efficiency score.
pub const EFFICIENCY_MULTIPLIER: f64 = 20.0;

/// Upper bound of the efficiency score.
pub const MAX_EFFICIENCY_SCORE: f64 = 100.0;

/// Revenue split by pool category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub mining: f64,
    pub inference: f64,
    pub total: f64,
}

/// Result of [`scale_to_power_limit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOutcome {
    pub allocation: AllocationVector,
    /// `1.0` when the input was already feasible.
    pub scale_factor: f64,
}

impl ScaleOutcome {
    pub fn was_scaled(&self) -> bool {
        self.scale_factor < 1.0
    }

    /// Reasoning suffix describing the reduction, if one happened.
    pub fn annotation(&self) -> Option<String> {
        self.was_scaled().then(|| scale_annotation(self.scale_factor))
    }
}

/// Full accounting for one allocation, after feasibility scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub allocation: AllocationVector,
    pub scale_factor: f64,
    pub power_usage_watts: f64,
    pub revenue: RevenueBreakdown,
    pub expected_cost: f64,
    pub efficiency_score: f64,
}

/// Total draw in watts: Σ units × per-unit power.
pub fn compute_power_usage(allocation: &AllocationVector, inventory: &InventorySpec) -> f64 {
    allocation
        .iter()
        .map(|(pool, units)| units as f64 * inventory.unit(pool).power_draw_watts)
        .sum()
}

/// Bring `allocation` under `power_limit`.
///
/// `power_usage` must be the usage of `allocation` under the inventory the
/// caller will account with. When it exceeds the limit every pool becomes
/// `floor(units × limit / power_usage)`; this is done once, without re-checking,
/// since truncation can only lower usage. An absent, zero or negative limit
/// means [`DEFAULT_POWER_LIMIT_WATTS`].
pub fn scale_to_power_limit(
    allocation: &AllocationVector,
    power_usage: f64,
    power_limit: Option<f64>,
) -> ScaleOutcome {
    let limit = resolve_power_limit(power_limit, DEFAULT_POWER_LIMIT_WATTS);

    if power_usage <= 0.0 || power_usage <= limit {
        return ScaleOutcome {
            allocation: *allocation,
            scale_factor: 1.0,
        };
    }

    let scale_factor = limit / power_usage;
    ScaleOutcome {
        allocation: allocation.scaled(scale_factor),
        scale_factor,
    }
}

/// `power_limit` if it is positive, otherwise `default`.
pub fn resolve_power_limit(power_limit: Option<f64>, default: f64) -> f64 {
    power_limit.filter(|watts| *watts > 0.0).unwrap_or(default)
}

/// Revenue at the most recent prices; all zero when `prices` is empty.
pub fn compute_revenue(
    allocation: &AllocationVector,
    inventory: &InventorySpec,
    prices: &[PriceSnapshot],
) -> RevenueBreakdown {
    let Some(snapshot) = latest(prices) else {
        return RevenueBreakdown::default();
    };

    let mut mining = 0.0;
    let mut inference = 0.0;
    for (pool, units) in allocation.iter() {
        let output = units as f64 * inventory.unit(pool).throughput;
        match pool.category() {
            PoolCategory::Mining => mining += output * snapshot.hash_price,
            PoolCategory::Inference => inference += output * snapshot.token_price,
        }
    }

    RevenueBreakdown {
        mining,
        inference,
        total: mining + inference,
    }
}

/// `power_usage × energy_price` of the latest snapshot, or zero without one.
///
/// Pass the post-scaling usage so the cost matches the reported allocation.
pub fn estimate_cost(power_usage: f64, prices: &[PriceSnapshot]) -> f64 {
    latest(prices).map_or(0.0, |p| power_usage * p.energy_price)
}

/// `min(100, revenue / cost × 20)`, or [`NEUTRAL_EFFICIENCY_SCORE`] when the
/// cost is not positive.
pub fn efficiency_score(total_revenue: f64, expected_cost: f64) -> f64 {
    if expected_cost > 0.0 {
        (total_revenue / expected_cost * EFFICIENCY_MULTIPLIER).min(MAX_EFFICIENCY_SCORE)
    } else {
        NEUTRAL_EFFICIENCY_SCORE
    }
}

/// `"(Scaled down by 0.77 to meet power constraints)"`.
pub fn scale_annotation(scale_factor: f64) -> String {
    format!("(Scaled down by {scale_factor:.2} to meet power constraints)")
}

/// Run the whole pipeline on one allocation.
pub fn evaluate(
    allocation: &AllocationVector,
    inventory: &InventorySpec,
    prices: &[PriceSnapshot],
    power_limit: Option<f64>,
) -> AllocationReport {
    let requested_usage = compute_power_usage(allocation, inventory);
    let scaled = scale_to_power_limit(allocation, requested_usage, power_limit);

    let power_usage_watts = if scaled.was_scaled() {
        compute_power_usage(&scaled.allocation, inventory)
    } else {
        requested_usage
    };
    let revenue = compute_revenue(&scaled.allocation, inventory, prices);
    let expected_cost = estimate_cost(power_usage_watts, prices);

    AllocationReport {
        allocation: scaled.allocation,
        scale_factor: scaled.scale_factor,
        power_usage_watts,
        revenue,
        expected_cost,
        efficiency_score: efficiency_score(revenue.total, expected_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::UnitSpec;
    use crate::pool::ResourcePool;

    fn site_inventory() -> InventorySpec {
        InventorySpec::new()
            .with_unit(ResourcePool::AirMiners, UnitSpec::new(0.0, 0.0))
            .with_unit(ResourcePool::HydroMiners, UnitSpec::new(1500.0, 0.02))
            .with_unit(ResourcePool::GpuCompute, UnitSpec::new(2000.0, 0.5))
    }

    fn site_prices() -> Vec<PriceSnapshot> {
        vec![PriceSnapshot::new(1.20, 3.56, 1.337)]
    }

    fn proposal() -> AllocationVector {
        AllocationVector::zero()
            .with(ResourcePool::HydroMiners, 300)
            .with(ResourcePool::GpuCompute, 100)
    }

    #[test]
    fn power_usage_sums_pools() {
        assert_eq!(compute_power_usage(&proposal(), &site_inventory()), 650_000.0);
    }

    #[test]
    fn revenue_splits_mining_and_inference() {
        let rev = compute_revenue(&proposal(), &site_inventory(), &site_prices());
        assert!((rev.mining - 7.2).abs() < 1e-9);
        assert!((rev.inference - 178.0).abs() < 1e-9);
        assert!((rev.total - 185.2).abs() < 1e-9);
    }

    #[test]
    fn revenue_uses_only_latest_snapshot() {
        let prices = vec![
            PriceSnapshot::new(1.0, 1.0, 1.0),
            PriceSnapshot::new(100.0, 100.0, 100.0),
        ];
        let rev = compute_revenue(&proposal(), &site_inventory(), &prices);
        assert!((rev.total - (300.0 * 0.02 + 100.0 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn feasible_allocation_is_unchanged() {
        let outcome = scale_to_power_limit(&proposal(), 650_000.0, None);
        assert_eq!(outcome.allocation, proposal());
        assert_eq!(outcome.scale_factor, 1.0);
        assert!(!outcome.was_scaled());
        assert!(outcome.annotation().is_none());
    }

    #[test]
    fn over_budget_allocation_is_truncated() {
        let outcome = scale_to_power_limit(&proposal(), 650_000.0, Some(500_000.0));
        assert!((outcome.scale_factor - 0.769_230_769).abs() < 1e-6);
        assert_eq!(outcome.allocation.get(ResourcePool::HydroMiners), 230);
        assert_eq!(outcome.allocation.get(ResourcePool::GpuCompute), 76);
        assert!(compute_power_usage(&outcome.allocation, &site_inventory()) <= 500_000.0);
        assert_eq!(
            outcome.annotation().as_deref(),
            Some("(Scaled down by 0.77 to meet power constraints)")
        );
    }

    #[test]
    fn zero_usage_is_always_feasible() {
        let outcome = scale_to_power_limit(&AllocationVector::zero(), 0.0, Some(0.0));
        assert_eq!(outcome.scale_factor, 1.0);
    }

    #[test]
    fn non_positive_limit_means_default() {
        for limit in [0.0, -5.0] {
            let outcome = scale_to_power_limit(&proposal(), 650_000.0, Some(limit));
            assert_eq!(outcome.scale_factor, 1.0);
            assert_eq!(outcome.allocation, proposal());
        }

        let outcome = scale_to_power_limit(&proposal(), 1_300_000.0, Some(0.0));
        assert!((outcome.scale_factor - 1_000_000.0 / 1_300_000.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_power_limit_ignores_non_positive_values() {
        assert_eq!(resolve_power_limit(None, 42.0), 42.0);
        assert_eq!(resolve_power_limit(Some(0.0), 42.0), 42.0);
        assert_eq!(resolve_power_limit(Some(-1.0), 42.0), 42.0);
        assert_eq!(resolve_power_limit(Some(7.5), 42.0), 7.5);
    }

    #[test]
    fn evaluate_with_zero_limit_keeps_the_allocation() {
        let report = evaluate(&proposal(), &site_inventory(), &site_prices(), Some(0.0));
        assert_eq!(report.allocation, proposal());
        assert_eq!(report.scale_factor, 1.0);
        assert!((report.revenue.total - 185.2).abs() < 1e-9);
    }

    #[test]
    fn cost_uses_energy_price() {
        let cost = estimate_cost(650_000.0, &site_prices());
        assert!((cost - 869_050.0).abs() < 1e-6);
        assert_eq!(estimate_cost(650_000.0, &[]), 0.0);
    }

    #[test]
    fn efficiency_is_capped_and_defaults_to_neutral() {
        assert_eq!(efficiency_score(10.0, 0.0), NEUTRAL_EFFICIENCY_SCORE);
        assert_eq!(efficiency_score(1_000.0, 1.0), MAX_EFFICIENCY_SCORE);
        assert!((efficiency_score(185.2, 869_050.0) - 185.2 / 869_050.0 * 20.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_costs_the_scaled_allocation() {
        let report = evaluate(&proposal(), &site_inventory(), &site_prices(), Some(500_000.0));
        let expected_power = 230.0 * 1500.0 + 76.0 * 2000.0;
        assert_eq!(report.power_usage_watts, expected_power);
        assert!((report.expected_cost - expected_power * 1.337).abs() < 1e-6);
        assert!((report.revenue.mining - 230.0 * 0.02 * 1.20).abs() < 1e-9);
        assert!((report.revenue.inference - 76.0 * 0.5 * 3.56).abs() < 1e-9);
    }

    #[test]
    fn evaluate_without_prices_is_degenerate_but_valid() {
        let report = evaluate(&proposal(), &site_inventory(), &[], None);
        assert_eq!(report.revenue, RevenueBreakdown::default());
        assert_eq!(report.expected_cost, 0.0);
        assert_eq!(report.efficiency_score, NEUTRAL_EFFICIENCY_SCORE);
        assert_eq!(report.power_usage_watts, 650_000.0);
    }
}
