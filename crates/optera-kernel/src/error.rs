//! Crate-level error types for `optera-kernel`.
//!
//! The accounting functions never fail; degenerate inputs resolve to defined
//! defaults. The only fallible operation is turning a string into a
//! [`ResourcePool`](crate::ResourcePool).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// A pool name that is not one of the five known pools.
    #[error("unknown resource pool: {0}")]
    UnknownPool(String),
}
