//! Cache Coordinator Module
//!
//! Public cache operations. Each one validates its input, consults the
//! configuration, applies the expiration policy and delegates storage to an
//! [`EntryStore`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::policy::{self, AccessDecision};
use crate::cache::retry::with_retry;
use crate::cache::{CacheEntry, CacheStats, KeyLocks, StatsRecorder, TtlPolicy};
use crate::config::CacheConfiguration;
use crate::error::{CacheError, Result};
use crate::store::EntryStore;

// == TTL Status ==
/// Remaining lifetime of a key, as reported by [`CacheCoordinator::time_to_live`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// No live entry under the key
    Missing,
    /// Entry never expires
    Persistent,
    /// Entry expires after the given duration unless refreshed
    Expires(Duration),
}

// == Cache Coordinator ==
/// Sliding-expiration cache in front of an entry store.
pub struct CacheCoordinator {
    store: Arc<dyn EntryStore>,
    config: Arc<CacheConfiguration>,
    locks: KeyLocks,
    stats: StatsRecorder,
}

impl CacheCoordinator {
    // == Constructor ==
    pub fn new(store: Arc<dyn EntryStore>, config: Arc<CacheConfiguration>) -> Self {
        Self {
            store,
            config,
            locks: KeyLocks::default(),
            stats: StatsRecorder::new(),
        }
    }

    pub fn config(&self) -> &Arc<CacheConfiguration> {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or expired. A hit on a
    /// sliding entry while sliding expiration is enabled pushes its deadline
    /// to now + window. The read and the refresh run under the key's lock so
    /// no concurrent write or removal can land between them.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.validate_key(key)?;
        with_retry(self.config.retry(), "get", || self.get_once(key)).await
    }

    async fn get_once(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _guard = self.locks.lock(key).await;

        let Some(entry) = self.store.fetch(key).await? else {
            self.stats.record_miss();
            return Ok(None);
        };

        let now = Instant::now();
        let sliding_enabled = self.config.is_sliding_expiration_enabled();
        match policy::on_access(&entry.expiration, sliding_enabled, now) {
            AccessDecision::Expired => {
                self.stats.record_expired();
                Ok(None)
            }
            AccessDecision::Keep => {
                self.stats.record_hit();
                Ok(Some(entry.value))
            }
            AccessDecision::Refresh(expiration) => {
                if self.store.touch(key, expiration).await? {
                    self.stats.record_refresh();
                } else {
                    // Evicted by the backend between fetch and touch
                    debug!("Key '{}' vanished before its window could be extended", key);
                }
                self.stats.record_hit();
                Ok(Some(entry.value))
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry and its
    /// expiration. Not retried on transient failure; see [`Self::set_idempotent`].
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: TtlPolicy) -> Result<()> {
        self.validate_write(key, &value, &ttl)?;
        self.set_once(key, value, ttl).await
    }

    /// Same as [`Self::set`], but retried on transient failure. Only use it
    /// when writing the same value twice is harmless.
    pub async fn set_idempotent(&self, key: &str, value: Vec<u8>, ttl: TtlPolicy) -> Result<()> {
        self.validate_write(key, &value, &ttl)?;
        with_retry(self.config.retry(), "set", || self.set_once(key, value.clone(), ttl)).await
    }

    /// Stores `value` with the configured default TTL.
    ///
    /// The default TTL is a sliding window while sliding expiration is
    /// enabled and an absolute TTL otherwise. Without a default TTL the
    /// entry never expires.
    pub async fn set_default(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let ttl = policy::default_policy(
            self.config.default_ttl(),
            self.config.is_sliding_expiration_enabled(),
        );
        self.set(key, value, ttl).await
    }

    async fn set_once(&self, key: &str, value: Vec<u8>, ttl: TtlPolicy) -> Result<()> {
        let _guard = self.locks.lock(key).await;
        let expiration = policy::on_write(ttl, Instant::now());
        self.store
            .store(CacheEntry::new(key, value, expiration))
            .await?;
        debug!("Stored key '{}' with {:?}", key, ttl);
        Ok(())
    }

    // == Remove ==
    /// Removes `key`. Returns false if no live entry was stored under it.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.validate_key(key)?;
        with_retry(self.config.retry(), "remove", move || async move {
            let _guard = self.locks.lock(key).await;
            Ok(self.store.delete(key).await?)
        })
        .await
    }

    // == Exists ==
    /// Checks whether a live entry exists. Never extends a sliding window.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(!matches!(self.time_to_live(key).await?, TtlStatus::Missing))
    }

    // == Time To Live ==
    /// Reports the remaining lifetime of `key` without refreshing it.
    pub async fn time_to_live(&self, key: &str) -> Result<TtlStatus> {
        self.validate_key(key)?;
        let entry = with_retry(self.config.retry(), "ttl", move || async move {
            Ok(self.store.fetch(key).await?)
        })
        .await?;

        let now = Instant::now();
        Ok(match entry {
            Some(entry) if entry.is_expired(now) => TtlStatus::Missing,
            Some(entry) => match entry.expiration.remaining(now) {
                Some(remaining) => TtlStatus::Expires(remaining),
                None => TtlStatus::Persistent,
            },
            None => TtlStatus::Missing,
        })
    }

    // == Validation ==
    fn validate_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::Validation("Key cannot be empty".to_string()));
        }
        let max = self.config.max_key_length();
        if key.len() > max {
            return Err(CacheError::Validation(format!(
                "Key exceeds maximum length of {} bytes",
                max
            )));
        }
        Ok(())
    }

    fn validate_write(&self, key: &str, value: &[u8], ttl: &TtlPolicy) -> Result<()> {
        self.validate_key(key)?;
        let max = self.config.max_value_size();
        if value.len() > max {
            return Err(CacheError::Validation(format!(
                "Value exceeds maximum size of {} bytes",
                max
            )));
        }
        policy::validate_policy(ttl).map_err(|msg| {
            warn!("Rejected write to '{}': {}", key, msg);
            CacheError::Validation(msg)
        })
    }
}
