//! Slidecache - A sliding-expiration cache coordinator
//!
//! Sits in front of a key-value store and enforces per-entry expiration
//! policies, refreshing sliding windows on read.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheCoordinator, TtlPolicy, TtlStatus};
pub use config::{CacheConfiguration, CacheOptions, Config};
pub use error::{CacheError, Result, StoreError};
pub use store::{EntryStore, MemoryStore};
pub use tasks::spawn_sweep_task;
