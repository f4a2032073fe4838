//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::cache::TtlPolicy;

/// Expiration requested in a SET body.
///
/// ```json
/// {"type": "sliding", "seconds": 30}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExpirationRequest {
    None,
    Absolute { seconds: u64 },
    Sliding { seconds: u64 },
}

impl From<ExpirationRequest> for TtlPolicy {
    fn from(req: ExpirationRequest) -> Self {
        match req {
            ExpirationRequest::None => TtlPolicy::None,
            ExpirationRequest::Absolute { seconds } => {
                TtlPolicy::Absolute(Duration::from_secs(seconds))
            }
            ExpirationRequest::Sliding { seconds } => {
                TtlPolicy::Sliding(Duration::from_secs(seconds))
            }
        }
    }
}

/// Request body for the SET operation (PUT /set)
///
/// Without `expiration` the configured default policy applies.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub expiration: Option<ExpirationRequest>,
}

/// Request body for PUT /config/sliding
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SlidingToggleRequest {
    pub enabled: bool,
}
