//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check coordinator behavior against a simple model.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tokio::runtime::{Builder, Runtime};

use crate::cache::{CacheCoordinator, TtlPolicy};
use crate::config::{CacheConfiguration, CacheOptions, MaxMemoryPolicy};
use crate::error::CacheError;
use crate::store::MemoryStore;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const WINDOW_MS: u64 = 1000;

// == Helpers ==
fn paused_runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

fn new_cache() -> (CacheCoordinator, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(TEST_MAX_ENTRIES, MaxMemoryPolicy::AllKeysLru));
    let config = Arc::new(CacheConfiguration::new(CacheOptions::default()));
    (CacheCoordinator::new(store.clone(), config), store)
}

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

/// Generates opaque values, including empty and non-UTF-8 bytes
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

/// One step of a sliding-window scenario
#[derive(Debug, Clone)]
enum Step {
    Advance(u64),
    Toggle(bool),
    Get,
    Exists,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1..WINDOW_MS).prop_map(Step::Advance),
        any::<bool>().prop_map(Step::Toggle),
        Just(Step::Get),
        Just(Step::Exists),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value without expiration and reading it back returns the same bytes.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in value_strategy()) {
        let rt = Runtime::new().unwrap();
        let (cache, _) = new_cache();

        let retrieved = rt.block_on(async {
            cache.set(&key, value.clone(), TtlPolicy::None).await.unwrap();
            cache.get(&key).await.unwrap()
        });
        prop_assert_eq!(retrieved, Some(value));
    }

    // Remove reports whether something was stored and leaves the key absent.
    #[test]
    fn prop_remove_semantics(key in valid_key_strategy(), value in value_strategy()) {
        let rt = Runtime::new().unwrap();
        let (cache, _) = new_cache();

        rt.block_on(async {
            prop_assert!(!cache.remove(&key).await.unwrap());
            cache.set(&key, value, TtlPolicy::None).await.unwrap();
            prop_assert!(cache.remove(&key).await.unwrap());
            prop_assert_eq!(cache.get(&key).await.unwrap(), None);
            prop_assert!(!cache.exists(&key).await.unwrap());
            Ok(())
        })?;
    }

    // A second set replaces both the value and the expiration of the first.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let rt = paused_runtime();
        let (cache, store) = new_cache();

        rt.block_on(async {
            cache.set(&key, value1, TtlPolicy::Absolute(Duration::from_millis(WINDOW_MS))).await.unwrap();
            cache.set(&key, value2.clone(), TtlPolicy::None).await.unwrap();
            tokio::time::advance(Duration::from_millis(WINDOW_MS * 2)).await;

            prop_assert_eq!(cache.get(&key).await.unwrap(), Some(value2));
            prop_assert_eq!(store.len().await, 1);
            Ok(())
        })?;
    }

    // Keys that fail validation never reach the store.
    #[test]
    fn prop_invalid_keys_rejected(extra in 1usize..64, value in value_strategy()) {
        let rt = Runtime::new().unwrap();
        let (cache, store) = new_cache();
        let long_key = "k".repeat(cache.config().max_key_length() + extra);

        rt.block_on(async {
            let result = cache.set(&long_key, value, TtlPolicy::None).await;
            prop_assert!(matches!(result, Err(CacheError::Validation(_))));
            prop_assert!(matches!(cache.get(&long_key).await, Err(CacheError::Validation(_))));
            prop_assert!(store.is_empty().await);
            Ok(())
        })?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // A sliding entry is visible exactly while virtual time is before its
    // deadline, and only reads with the toggle on move that deadline.
    #[test]
    fn prop_sliding_matches_model(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let rt = paused_runtime();
        let (cache, _) = new_cache();
        let window = Duration::from_millis(WINDOW_MS);

        rt.block_on(async {
            cache.set("session", b"token".to_vec(), TtlPolicy::Sliding(window)).await.unwrap();

            let mut now = Duration::ZERO;
            let mut deadline = window;
            let mut enabled = true;

            for step in steps {
                match step {
                    Step::Advance(ms) => {
                        tokio::time::advance(Duration::from_millis(ms)).await;
                        now += Duration::from_millis(ms);
                    }
                    Step::Toggle(on) => {
                        cache.config().set_sliding_expiration(on);
                        enabled = on;
                    }
                    Step::Get => {
                        let live = now < deadline;
                        let got = cache.get("session").await.unwrap();
                        prop_assert_eq!(got.is_some(), live, "get at {:?}, deadline {:?}", now, deadline);
                        if live && enabled {
                            deadline = now + window;
                        }
                    }
                    Step::Exists => {
                        let live = now < deadline;
                        prop_assert_eq!(cache.exists("session").await.unwrap(), live);
                    }
                }
            }
            Ok(())
        })?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Parallel readers of one sliding key never lose or corrupt it.
    #[test]
    fn prop_concurrent_get_storm(value in value_strategy(), readers in 2usize..64) {
        let rt = Runtime::new().unwrap();
        let (cache, _) = new_cache();
        let cache = Arc::new(cache);

        rt.block_on(async {
            cache
                .set("hot", value.clone(), TtlPolicy::Sliding(Duration::from_secs(60)))
                .await
                .unwrap();

            let handles: Vec<_> = (0..readers)
                .map(|_| {
                    let cache = Arc::clone(&cache);
                    tokio::spawn(async move { cache.get("hot").await })
                })
                .collect();

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert_eq!(result.unwrap(), Some(value.clone()));
            }

            let stats = cache.stats();
            prop_assert_eq!(stats.hits, readers as u64);
            prop_assert_eq!(stats.refreshes, readers as u64);
            Ok(())
        })?;
    }
}
