//! Cache Entry Module
//!
//! Defines individual cache entries and the expiration metadata they carry.

use std::time::Duration;

use tokio::time::Instant;

// == TTL Policy ==
/// Expiration requested by a caller when writing a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlPolicy {
    /// Entry never expires
    None,
    /// Entry expires a fixed duration after the write
    Absolute(Duration),
    /// Entry expires after the window elapses without a read
    Sliding(Duration),
}

// == Expiration ==
/// Expiration state stored alongside an entry.
///
/// Exactly one policy governs an entry at a time. Sliding entries keep their
/// window so a later read can push the deadline forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    Never,
    Absolute { deadline: Instant },
    Sliding { window: Duration, deadline: Instant },
}

impl Expiration {
    // == Constructor ==
    /// Computes the metadata for a write happening at `now`.
    ///
    /// A deadline too far out for `Instant` to represent means the entry
    /// never expires.
    pub fn from_policy(policy: TtlPolicy, now: Instant) -> Self {
        match policy {
            TtlPolicy::None => Expiration::Never,
            TtlPolicy::Absolute(ttl) => match now.checked_add(ttl) {
                Some(deadline) => Expiration::Absolute { deadline },
                None => Expiration::Never,
            },
            TtlPolicy::Sliding(window) => match now.checked_add(window) {
                Some(deadline) => Expiration::Sliding { window, deadline },
                None => Expiration::Never,
            },
        }
    }

    /// Returns the deadline, or None if the entry never expires.
    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Expiration::Never => None,
            Expiration::Absolute { deadline } | Expiration::Sliding { deadline, .. } => {
                Some(*deadline)
            }
        }
    }

    /// Returns the sliding window, if this is a sliding entry.
    pub fn window(&self) -> Option<Duration> {
        match self {
            Expiration::Sliding { window, .. } => Some(*window),
            _ => None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches the deadline, so a zero TTL is
    /// expired at the instant it was written.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// Expired entries report `Duration::ZERO`.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    /// Opaque value bytes
    pub value: Vec<u8>,
    pub expiration: Expiration,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: Vec<u8>, expiration: Expiration) -> Self {
        Self {
            key: key.into(),
            value,
            expiration,
        }
    }

    /// Shorthand for [`Expiration::is_expired`].
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiration.is_expired(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_from_policy() {
        let now = Instant::now();

        assert_eq!(Expiration::from_policy(TtlPolicy::None, now), Expiration::Never);
        assert_eq!(
            Expiration::from_policy(TtlPolicy::Absolute(Duration::from_secs(5)), now),
            Expiration::Absolute {
                deadline: now + Duration::from_secs(5)
            }
        );
        assert_eq!(
            Expiration::from_policy(TtlPolicy::Sliding(Duration::from_secs(5)), now),
            Expiration::Sliding {
                window: Duration::from_secs(5),
                deadline: now + Duration::from_secs(5)
            }
        );
    }

    #[test]
    fn test_never_does_not_expire() {
        let now = Instant::now();
        let expiration = Expiration::Never;

        assert!(!expiration.is_expired(now + Duration::from_secs(86_400)));
        assert!(expiration.remaining(now).is_none());
        assert!(expiration.deadline().is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let expiration = Expiration::from_policy(TtlPolicy::Absolute(Duration::ZERO), now);

        // Expired at the very instant it was written
        assert!(expiration.is_expired(now));
        assert_eq!(expiration.remaining(now), Some(Duration::ZERO));
    }

    #[test]
    fn test_remaining() {
        let now = Instant::now();
        let expiration = Expiration::from_policy(TtlPolicy::Sliding(Duration::from_secs(10)), now);

        assert_eq!(
            expiration.remaining(now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(
            expiration.remaining(now + Duration::from_secs(30)),
            Some(Duration::ZERO)
        );
        assert_eq!(expiration.window(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_unrepresentable_deadline_never_expires() {
        let now = Instant::now();
        let huge = Duration::from_secs(u64::MAX);

        assert_eq!(
            Expiration::from_policy(TtlPolicy::Absolute(huge), now),
            Expiration::Never
        );
        assert_eq!(
            Expiration::from_policy(TtlPolicy::Sliding(huge), now),
            Expiration::Never
        );
    }

    #[test]
    fn test_entry_is_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new(
            "k",
            b"v".to_vec(),
            Expiration::from_policy(TtlPolicy::Absolute(Duration::from_secs(1)), now),
        );

        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_secs(1)));
    }
}
