//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiration metadata.
///
/// The key is stored alongside the value so that an entry popped from the
/// back of the recency list can be unregistered from the lookup table.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The lookup key
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `key` - The lookup key
    /// * `value` - The value to store
    /// * `ttl` - Time to live; `Duration::ZERO` means the entry never expires
    pub fn new(key: K, value: V, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: expiration_from(Instant::now(), ttl),
        }
    }

    // == Replace ==
    /// Overwrites value and expiration in place, keeping the key.
    pub fn replace(&mut self, value: V, ttl: Duration) {
        self.value = value;
        self.expires_at = expiration_from(Instant::now(), ttl);
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at the given instant.
    ///
    /// An entry is expired strictly after its deadline. Entries without a
    /// deadline never expire.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    /// Checks whether the entry has expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == TTL Override ==
/// Per-write expiration override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the cache's default TTL
    #[default]
    Default,
    /// Never expire, regardless of the default
    Never,
    /// Expire after the given duration; `Duration::ZERO` falls back to the default
    After(Duration),
}

impl Ttl {
    /// Resolves the override against a default, yielding the effective TTL
    /// where `Duration::ZERO` means "never expires".
    pub fn resolve(self, default: Duration) -> Duration {
        match self {
            Ttl::Default => default,
            Ttl::Never => Duration::ZERO,
            Ttl::After(ttl) if ttl.is_zero() => default,
            Ttl::After(ttl) => ttl,
        }
    }
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::After(ttl)
    }
}

/// Computes the absolute deadline for a TTL; zero means "never".
fn expiration_from(now: Instant, ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        now.checked_add(ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("k", "test_value", Duration::ZERO);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("k", "test_value", Duration::from_secs(60));

        assert_eq!(entry.key, "k");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("k", 1, Duration::from_millis(50));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("k", 1, Duration::from_secs(10));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            key: "k",
            value: "test",
            expires_at: Some(now),
        };

        // Exactly at the deadline the entry is still live
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_ttl_resolve() {
        let default = Duration::from_secs(5);

        assert_eq!(Ttl::Default.resolve(default), default);
        assert_eq!(Ttl::Never.resolve(default), Duration::ZERO);
        assert_eq!(Ttl::After(Duration::ZERO).resolve(default), default);
        assert_eq!(Ttl::from(Duration::from_secs(3)).resolve(default), Duration::from_secs(3));
        assert_eq!(Ttl::Default.resolve(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_replace_resets_expiration() {
        let mut entry = CacheEntry::new("k", 1, Duration::from_secs(1));
        entry.replace(2, Duration::ZERO);

        assert_eq!(entry.value, 2);
        assert!(entry.expires_at.is_none());

        entry.replace(3, Duration::from_secs(30));
        assert_eq!(entry.value, 3);
        assert!(entry.expires_at.is_some());
    }
}
