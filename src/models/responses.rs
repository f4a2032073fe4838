//! Response DTOs for the cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, TtlStatus};

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    /// Stored bytes, lossily decoded as UTF-8
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: &[u8]) -> Self {
        Self {
            key: key.into(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// False when nothing was stored under the key
    pub removed: bool,
}

/// Response body for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for GET /ttl/:key
///
/// `status` is one of `missing`, `persistent` or `expires`; `ttl_ms` is set
/// only for `expires`.
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub status: &'static str,
    pub ttl_ms: Option<u64>,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, status: TtlStatus) -> Self {
        let (status, ttl_ms) = match status {
            TtlStatus::Missing => ("missing", None),
            TtlStatus::Persistent => ("persistent", None),
            TtlStatus::Expires(remaining) => ("expires", Some(remaining.as_millis() as u64)),
        };
        Self {
            key: key.into(),
            status,
            ttl_ms,
        }
    }
}

/// Response body for GET and PUT /config/sliding
#[derive(Debug, Clone, Serialize)]
pub struct SlidingToggleResponse {
    pub enabled: bool,
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub expired: u64,
    /// Entries evicted by the store to make room
    pub evictions: u64,
    /// Entries currently held by the store
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub sliding_expiration: bool,
}

impl StatsResponse {
    pub fn new(
        stats: &CacheStats,
        evictions: u64,
        total_entries: usize,
        sliding_expiration: bool,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            refreshes: stats.refreshes,
            expired: stats.expired,
            evictions,
            total_entries,
            hit_rate: stats.hit_rate(),
            sliding_expiration,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
