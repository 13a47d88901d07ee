//! Cache Statistics Module
//!
//! Tracks read traffic and removals, and exposes point-in-time snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Counters ==
/// Monotonic counters shared by a cache handle.
///
/// Counters are bumped inside the critical section that performs the
/// corresponding operation, so a snapshot taken under the lock is consistent
/// with the entries it reports.
#[derive(Debug, Default)]
pub struct CacheCounters {
    gets: AtomicU64,
    hits: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a read attempt, hit or miss.
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read that returned a live value.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expirations(&self, count: usize) {
        self.expirations.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn gets(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Relaxed)
    }
}

// == Cache Status ==
/// Point-in-time snapshot of a cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    /// Configured capacity (0 = unbounded)
    pub capacity: usize,
    /// Number of entries currently stored, including expired ones not yet swept
    pub current_size: usize,
    /// Total read attempts
    pub total_gets: u64,
    /// Reads that returned a live value
    pub total_hits: u64,
    /// Entries evicted by the LRU policy
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStatus {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.total_gets == 0 {
            0.0
        } else {
            self.total_hits as f64 / self.total_gets as f64
        }
    }

    /// Number of reads that found nothing live.
    pub fn misses(&self) -> u64 {
        self.total_gets.saturating_sub(self.total_hits)
    }
}
