//! Entry Store Module
//!
//! The capability the coordinator consumes from a key-value backend, plus
//! the bundled in-process implementation.

mod lru;
mod memory;

use async_trait::async_trait;

use crate::cache::{CacheEntry, Expiration};
use crate::error::StoreResult;

pub use lru::LruTracker;
pub use memory::MemoryStore;

// == Entry Store ==
/// Key-value backend with native expiration.
///
/// Implementations report connection problems and timeouts as
/// [`StoreError`](crate::error::StoreError) and never as a missing key.
#[async_trait]
pub trait EntryStore: Send + Sync + 'static {
    /// Returns the entry stored under `key`, or None if absent or expired.
    async fn fetch(&self, key: &str) -> StoreResult<Option<CacheEntry>>;

    /// Writes the entry, replacing any previous value and expiration.
    async fn store(&self, entry: CacheEntry) -> StoreResult<()>;

    /// Removes `key`. Returns false if nothing live was stored under it.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Replaces the expiration of a live entry without rewriting its value.
    /// Returns false if the key is absent or expired.
    async fn touch(&self, key: &str, expiration: Expiration) -> StoreResult<bool>;
}
