//! Memory Store Module
//!
//! In-process entry store combining HashMap storage with LRU tracking and
//! lazy plus swept expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{CacheEntry, Expiration};
use crate::config::{MaxMemoryPolicy, StoreSettings};
use crate::error::{StoreError, StoreResult};
use crate::store::{EntryStore, LruTracker};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    evictions: u64,
}

impl Inner {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.lru.remove(key);
        self.entries.remove(key)
    }

    /// Drops `key` if it is past its deadline. Returns true if it was dropped.
    fn expire_if_due(&mut self, key: &str, now: Instant) -> bool {
        let due = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired(now))
            .unwrap_or(false);
        if due {
            self.remove(key);
        }
        due
    }
}

// == Memory Store ==
/// Entry store held entirely in process memory.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    max_entries: usize,
    policy: MaxMemoryPolicy,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` keys.
    pub fn new(max_entries: usize, policy: MaxMemoryPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries,
            policy,
        }
    }

    /// Creates a store from connection settings.
    pub fn from_settings(settings: &StoreSettings) -> Self {
        info!(
            "Opening memory store for {}:{} db={} (max_entries={}, maxmemory-policy={})",
            settings.host,
            settings.port,
            settings.database,
            settings.max_entries,
            settings.max_memory_policy
        );
        Self::new(settings.max_entries, settings.max_memory_policy)
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.write().await;

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.remove(key);
        }
        expired_keys.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    /// Number of entries dropped to make room for new keys.
    pub async fn evictions(&self) -> u64 {
        self.inner.read().await.evictions
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn fetch(&self, key: &str) -> StoreResult<Option<CacheEntry>> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;

        if inner.expire_if_due(key, now) {
            debug!("Dropped expired key '{}' on fetch", key);
            return Ok(None);
        }

        let entry = inner.entries.get(key).cloned();
        if entry.is_some() {
            inner.lru.touch(key);
        }
        Ok(entry)
    }

    async fn store(&self, entry: CacheEntry) -> StoreResult<()> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.expire_if_due(&entry.key, now);

        let is_overwrite = inner.entries.contains_key(&entry.key);
        if !is_overwrite && inner.entries.len() >= self.max_entries {
            match self.policy {
                MaxMemoryPolicy::AllKeysLru => match inner.lru.evict_oldest() {
                    Some(evicted) => {
                        inner.entries.remove(&evicted);
                        inner.evictions += 1;
                        debug!("Evicted least recently used key '{}'", evicted);
                    }
                    None => {
                        return Err(StoreError::OutOfMemory(
                            "store is full and nothing can be evicted".to_string(),
                        ))
                    }
                },
                MaxMemoryPolicy::NoEviction => {
                    return Err(StoreError::OutOfMemory(format!(
                        "store holds {} entries and eviction is disabled",
                        self.max_entries
                    )))
                }
            }
        }

        inner.lru.touch(&entry.key);
        inner.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        Ok(inner
            .remove(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false))
    }

    async fn touch(&self, key: &str, expiration: Expiration) -> StoreResult<bool> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;

        if inner.expire_if_due(key, now) {
            return Ok(false);
        }
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.expiration = expiration;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
