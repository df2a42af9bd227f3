//! Gateway error types

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use optera_foundation::AllocationError;
use optera_foundation::llm::LLMError;
use optera_foundation::market::MarketError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    InvalidJson(#[from] JsonRejection),

    #[error(transparent)]
    InvalidQuery(#[from] QueryRejection),

    #[error("market data unavailable: {0}")]
    Market(#[from] MarketError),

    #[error("language model unavailable: {0}")]
    Llm(#[from] LLMError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AllocationError> for GatewayError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Market(e) => GatewayError::Market(e),
            AllocationError::Llm(e) => GatewayError::Llm(e),
        }
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_)
            | GatewayError::InvalidJson(_)
            | GatewayError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            GatewayError::Market(_) | GatewayError::Llm(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_)
            | GatewayError::InvalidJson(_)
            | GatewayError::InvalidQuery(_) => "INVALID_REQUEST",
            GatewayError::Market(_) => "MARKET_UNAVAILABLE",
            GatewayError::Llm(_) => "LLM_UNAVAILABLE",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.code(), error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
