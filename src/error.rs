//! Error types for the cache coordinator
//!
//! Provides unified error handling using thiserror. A missing key is never an
//! error: lookups report it as `None` / `false`.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failure reported by an entry store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer in time
    #[error("store timed out after {0:?}")]
    Timeout(Duration),

    /// Backend refused the write because it is at capacity
    #[error("store out of memory: {0}")]
    OutOfMemory(String),
}

// == Cache Error Enum ==
/// Unified error type for the cache coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Bad key, value or TTL supplied by the caller
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Connection or timeout failure talking to the store, safe to retry
    #[error("Backend unavailable: {0}")]
    Transient(String),

    /// Store is full and configured not to evict
    #[error("Cache full: {0}")]
    CacheFull(String),
}

impl CacheError {
    /// Returns true if the operation may succeed when attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CacheError::Transient(_))
    }
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) | StoreError::Timeout(_) => {
                CacheError::Transient(err.to_string())
            }
            StoreError::OutOfMemory(msg) => CacheError::CacheFull(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Validation(_) => StatusCode::BAD_REQUEST,
            CacheError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::CacheFull(_) => StatusCode::INSUFFICIENT_STORAGE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache coordinator.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by entry store backends.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
