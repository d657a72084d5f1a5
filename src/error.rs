//! Error types for the smart cache
//!
//! Store and transport failures are plain `thiserror` enums consumed by the
//! façade. `ApiError` is the HTTP-facing error of the admin service.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error ==
/// Failure reported by an expiring key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key is empty or longer than the store accepts
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Serialized value exceeds the store's size limit
    #[error("Value too large: {size} bytes (max {max})")]
    ValueTooLarge { size: usize, max: usize },

    /// Lifetime is zero or too large to schedule
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Store is full and no entry could be evicted
    #[error("Store full: {0}")]
    Full(String),

    /// Backend-specific failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

// == Fetch Error ==
/// Failure of a single transport fetch during preload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, TLS...)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Unexpected status {0}")]
    Status(u16),

    /// The response body could not be read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_body() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

// == API Error ==
/// Error type returned by the HTTP admin handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not present (or expired) in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
