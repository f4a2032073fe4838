//! Expiration Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! memory store. Reads already ignore expired entries; the sweep only
//! reclaims memory for keys nobody asks for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that purges expired entries every `interval`.
///
/// Returns the JoinHandle so the caller can abort the task on shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new(1000, MaxMemoryPolicy::AllKeysLru));
/// let sweep_handle = spawn_sweep_task(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(store: Arc<MemoryStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiration sweep every {}ms", interval.as_millis());

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}
