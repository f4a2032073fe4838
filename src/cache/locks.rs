//! Key Lock Module
//!
//! Striped async locks serializing read-then-refresh sequences per key.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tokio::sync::{Mutex, MutexGuard};

/// Number of lock stripes
pub const DEFAULT_STRIPES: usize = 64;

// == Key Locks ==
/// Fixed table of mutexes; every key maps to exactly one stripe.
///
/// Two keys may share a stripe, which only costs contention. A key never
/// maps to two stripes, so operations on one key are always serialized.
#[derive(Debug)]
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
    mask: usize,
}

impl KeyLocks {
    /// Creates a table with `stripes` rounded up to a power of two.
    pub fn new(stripes: usize) -> Self {
        let count = stripes.max(1).next_power_of_two();
        Self {
            stripes: (0..count).map(|_| Mutex::new(())).collect(),
            mask: count - 1,
        }
    }

    /// Index of the stripe guarding `key`.
    pub fn stripe_for(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & self.mask
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_for(key)].lock().await
    }

    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
