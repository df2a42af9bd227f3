//! Foundation error types

use crate::llm::LLMError;
use crate::market::MarketError;
use thiserror::Error;

/// Failure of an agent-level operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("market data unavailable: {0}")]
    Market(#[from] MarketError),

    #[error("language model request failed: {0}")]
    Llm(#[from] LLMError),
}

pub type AllocationResult<T> = Result<T, AllocationError>;
