//! Market data errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MarketError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// Upstream answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },

    #[error("market client configuration error: {0}")]
    Config(String),
}

pub type MarketResult<T> = Result<T, MarketError>;
