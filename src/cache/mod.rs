//! Cache Module
//!
//! Sliding-expiration cache coordinator, its expiration policy and supporting
//! pieces.

mod coordinator;
mod entry;
mod locks;
pub mod policy;
mod retry;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use coordinator::{CacheCoordinator, TtlStatus};
pub use entry::{CacheEntry, Expiration, TtlPolicy};
pub use locks::KeyLocks;
pub use retry::{with_retry, RetryConfig, MAX_RETRIES};
pub use stats::{CacheStats, StatsRecorder};
