//! Expiration Policy Module
//!
//! Pure decisions about expiration metadata. Nothing here touches the store
//! or blocks; callers pass in the toggle state and the current instant.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{Expiration, TtlPolicy};

/// Longest TTL or sliding window a caller may request (100 years).
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Access Decision ==
/// Outcome of reading an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Deadline has passed; the entry must be treated as absent
    Expired,
    /// Entry is live and its metadata stays as it is
    Keep,
    /// Entry is live and its expiration must be rewritten
    Refresh(Expiration),
}

/// Decides what a successful read at `now` does to an entry's expiration.
///
/// Only sliding entries read while the toggle is enabled get a new deadline
/// of `now + window`. With the toggle off a sliding entry keeps counting down
/// towards its last computed deadline and is not converted to absolute.
pub fn on_access(expiration: &Expiration, sliding_enabled: bool, now: Instant) -> AccessDecision {
    if expiration.is_expired(now) {
        return AccessDecision::Expired;
    }

    match expiration {
        Expiration::Sliding { window, .. } if sliding_enabled => match now.checked_add(*window) {
            Some(deadline) => AccessDecision::Refresh(Expiration::Sliding {
                window: *window,
                deadline,
            }),
            None => AccessDecision::Keep,
        },
        _ => AccessDecision::Keep,
    }
}

/// Computes the metadata for a write at `now`.
pub fn on_write(policy: TtlPolicy, now: Instant) -> Expiration {
    Expiration::from_policy(policy, now)
}

/// Policy applied when the caller does not pick one.
///
/// The configured default TTL becomes a sliding window while the toggle is
/// enabled and an absolute TTL otherwise.
pub fn default_policy(default_ttl: Option<Duration>, sliding_enabled: bool) -> TtlPolicy {
    match default_ttl {
        None => TtlPolicy::None,
        Some(ttl) if sliding_enabled => TtlPolicy::Sliding(ttl),
        Some(ttl) => TtlPolicy::Absolute(ttl),
    }
}

/// Checks a caller-supplied policy.
///
/// A zero absolute TTL is legal and means the entry is expired on arrival.
/// A zero sliding window could never be extended, so it is refused. Anything
/// longer than [`MAX_TTL`] is refused as well.
pub fn validate_policy(policy: &TtlPolicy) -> Result<(), String> {
    match policy {
        TtlPolicy::Sliding(window) if window.is_zero() => {
            Err("Sliding window must be greater than zero".to_string())
        }
        TtlPolicy::Absolute(ttl) | TtlPolicy::Sliding(ttl) if *ttl > MAX_TTL => Err(format!(
            "TTL of {}s exceeds the maximum of {}s",
            ttl.as_secs(),
            MAX_TTL.as_secs()
        )),
        _ => Ok(()),
    }
}
