//! Allocation vectors
//!
//! An [`AllocationVector`] is a fixed-size map from [`ResourcePool`] to a
//! unit count. It always carries all five pools; on the wire it is a flat JSON
//! object keyed by pool name.
//!
//! Deserialization is lenient because proposals usually come from a language
//! model: absent pools are zero, unknown keys are skipped, `null` is zero and
//! non-negative floats are truncated toward zero. Negative or non-numeric
//! counts are rejected.

use crate::pool::ResourcePool;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AllocationVector {
    units: [u64; 5],
}

impl AllocationVector {
    /// Build a vector in wire order: air, hydro, immersion, gpu, asic.
    pub const fn new(air: u64, hydro: u64, immersion: u64, gpu: u64, asic: u64) -> Self {
        Self {
            units: [air, hydro, immersion, gpu, asic],
        }
    }

    pub const fn zero() -> Self {
        Self { units: [0; 5] }
    }

    pub fn with(mut self, pool: ResourcePool, units: u64) -> Self {
        self.set(pool, units);
        self
    }

    pub fn get(&self, pool: ResourcePool) -> u64 {
        self.units[pool.index()]
    }

    pub fn set(&mut self, pool: ResourcePool, units: u64) {
        self.units[pool.index()] = units;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourcePool, u64)> + '_ {
        ResourcePool::ALL
            .into_iter()
            .map(move |pool| (pool, self.get(pool)))
    }

    /// Sum of all pools, saturating at `u64::MAX`.
    pub fn total_units(&self) -> u64 {
        self.units.iter().fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    pub fn is_empty(&self) -> bool {
        self.units.iter().all(|&n| n == 0)
    }

    /// Multiply every count by `factor` and truncate toward zero.
    ///
    /// Negative or NaN factors yield zero units.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        for n in out.units.iter_mut() {
            // `as u64` saturates: NaN and negatives become 0.
            *n = (*n as f64 * factor).floor() as u64;
        }
        out
    }
}

impl fmt::Display for AllocationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (pool, units) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{pool}={units}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for AllocationVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ResourcePool::ALL.len()))?;
        for (pool, units) in self.iter() {
            map.serialize_entry(pool.as_str(), &units)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AllocationVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AllocationVisitor)
    }
}

struct AllocationVisitor;

impl<'de> Visitor<'de> for AllocationVisitor {
    type Value = AllocationVector;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of resource pool names to unit counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = AllocationVector::zero();
        while let Some(key) = access.next_key::<String>()? {
            match key.parse::<ResourcePool>() {
                Ok(pool) => {
                    let UnitCount(n) = access.next_value()?;
                    out.set(pool, n);
                }
                Err(_) => {
                    access.next_value::<de::IgnoredAny>()?;
                }
            }
        }
        Ok(out)
    }
}

/// A unit count accepted from integers, floats or `null`.
struct UnitCount(u64);

impl<'de> Deserialize<'de> for UnitCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UnitCountVisitor)
    }
}

struct UnitCountVisitor;

impl Visitor<'_> for UnitCountVisitor {
    type Value = UnitCount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative unit count")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<UnitCount, E> {
        Ok(UnitCount(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<UnitCount, E> {
        u64::try_from(v)
            .map(UnitCount)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<UnitCount, E> {
        if v.is_finite() && v >= 0.0 {
            Ok(UnitCount(v.trunc() as u64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<UnitCount, E> {
        Ok(UnitCount(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<UnitCount, E> {
        Ok(UnitCount(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_all_five_pools() {
        let v = AllocationVector::zero().with(ResourcePool::GpuCompute, 30);
        let json = serde_json::to_value(v).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert_eq!(obj["gpu_compute"], 30);
        assert_eq!(obj["air_miners"], 0);
    }

    #[test]
    fn lenient_deserialization() {
        let json = r#"{
            "hydro_miners": 12.9,
            "gpu_compute": 40,
            "asic_compute": null,
            "quantum_rigs": 7
        }"#;
        let v: AllocationVector = serde_json::from_str(json).unwrap();
        assert_eq!(v, AllocationVector::new(0, 12, 0, 40, 0));
    }

    #[test]
    fn rejects_negative_counts() {
        assert!(serde_json::from_str::<AllocationVector>(r#"{"air_miners": -3}"#).is_err());
        assert!(serde_json::from_str::<AllocationVector>(r#"{"air_miners": -0.5}"#).is_err());
        assert!(serde_json::from_str::<AllocationVector>(r#"{"air_miners": "lots"}"#).is_err());
    }

    #[test]
    fn scaled_truncates() {
        let v = AllocationVector::new(0, 300, 0, 100, 0);
        let factor = 500_000.0 / 650_000.0;
        assert_eq!(v.scaled(factor), AllocationVector::new(0, 230, 0, 76, 0));
        assert_eq!(v.scaled(-1.0), AllocationVector::zero());
        assert_eq!(v.scaled(f64::NAN), AllocationVector::zero());
    }

    #[test]
    fn total_units_saturates() {
        let v: AllocationVector =
            serde_json::from_str(r#"{"gpu_compute": 1e30, "asic_compute": 1e30}"#).unwrap();
        assert_eq!(v.get(ResourcePool::GpuCompute), u64::MAX);
        assert_eq!(v.total_units(), u64::MAX);
    }

    #[test]
    fn display_lists_pools_in_order() {
        let v = AllocationVector::new(1, 2, 3, 4, 5);
        assert_eq!(
            v.to_string(),
            "air_miners=1, hydro_miners=2, immersion_miners=3, gpu_compute=4, asic_compute=5"
        );
        assert_eq!(v.total_units(), 15);
        assert!(!v.is_empty());
        assert!(AllocationVector::zero().is_empty());
    }
}
