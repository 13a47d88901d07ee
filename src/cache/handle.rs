//! Cache Handle Module
//!
//! Thread-safe cache: one [`CacheStore`] behind a single read/write lock,
//! counters, and the background expiration sweeper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, CacheStatus, CacheStore, Lookup, Ttl};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper_task, Sweep};

/// State shared between the handle and the sweeper.
#[derive(Debug)]
struct Shared<K, V> {
    store: RwLock<CacheStore<K, V>>,
    counters: CacheCounters,
}

impl<K, V> Shared<K, V>
where
    K: Hash + Eq + Clone,
{
    fn delete_expired(&self) -> usize {
        let mut store = self.store.write();
        let removed = store.delete_expired();
        self.counters.record_expirations(removed);
        removed
    }
}

impl<K, V> Sweep for Shared<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn sweep(&self) -> usize {
        self.delete_expired()
    }
}

// == Cache ==
/// A concurrency-safe LRU cache with per-entry TTL.
///
/// Every operation holds one coarse lock for its whole duration. Reads that
/// promote an entry take the exclusive side of the lock, since they reorder
/// the recency list; `status`, `len`, `peek` and friends take the shared side.
///
/// Values are handed out by `Clone`. Store `Arc<T>` values to share one
/// allocation between the cache and its callers.
///
/// A capacity of 0 combined with a zero default TTL leaves memory unbounded;
/// callers must set one or the other.
///
/// Dropping the cache stops its sweeper.
#[derive(Debug)]
pub struct Cache<K, V> {
    shared: Arc<Shared<K, V>>,
    shutdown: watch::Sender<bool>,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its sweeper on the current tokio runtime.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, 0 for no limit
    /// * `default_ttl` - TTL for writes without an override, zero for none
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity, default_ttl))
    }

    /// Creates a cache from a full configuration.
    ///
    /// # Errors
    /// - [`CacheError::InvalidConfig`] if the sweep interval is zero or too
    ///   large to schedule
    /// - [`CacheError::NoRuntime`] if called outside a tokio runtime
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        if config.is_unbounded() {
            warn!("Cache has no capacity and no default TTL; caller must bound memory");
        }

        let shared = Arc::new(Shared {
            store: RwLock::new(CacheStore::new(config.capacity, config.default_ttl)),
            counters: CacheCounters::new(),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);
        let sweeper = spawn_sweeper_task(
            Arc::downgrade(&shared),
            config.sweep_interval,
            shutdown_rx,
        );

        info!(
            "Cache initialized: capacity={}, default_ttl={}ms, sweep_interval={}ms",
            config.capacity,
            config.default_ttl.as_millis(),
            config.sweep_interval.as_millis()
        );

        Ok(Self {
            shared,
            shutdown,
            sweeper: Some(sweeper),
        })
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired, promoting it
    /// to most recently used.
    ///
    /// Every call counts as a get; only a live value counts as a hit. An
    /// expired entry found here is removed immediately.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.shared.store.write();
        self.shared.counters.record_get();

        match store.get(key) {
            Lookup::Hit(value) => {
                self.shared.counters.record_hit();
                Some(value.clone())
            }
            Lookup::Expired => {
                self.shared.counters.record_expirations(1);
                None
            }
            Lookup::Missing => None,
        }
    }

    /// Returns a live value without promoting it or touching the counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.read().peek(key).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.read().contains_key(key)
    }

    /// Remaining TTL of a live entry.
    ///
    /// Returns `None` if the key is absent or expired, `Some(None)` if the
    /// entry never expires.
    pub fn ttl<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.read().ttl(key)
    }

    // == Set ==
    /// Stores a value under the cache's default TTL.
    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, Ttl::Default);
    }

    /// Stores a value with an explicit TTL override.
    ///
    /// Overwriting an existing key never evicts. Inserting a new key into a
    /// full cache evicts the least recently used entry.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: impl Into<Ttl>) {
        let mut store = self.shared.store.write();
        if store.set(key, value, ttl.into()).is_some() {
            self.shared.counters.record_eviction();
            debug!("Evicted least recently used entry (capacity {})", store.capacity());
        }
    }

    // == Delete ==
    /// Removes `key`; returns whether it was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.store.write().delete(key).is_some()
    }

    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        let mut store = self.shared.store.write();
        let evicted = store.remove_oldest();
        if evicted.is_some() {
            self.shared.counters.record_eviction();
        }
        evicted
    }

    /// Removes every expired entry now, without waiting for the sweeper.
    pub fn delete_expired(&self) -> usize {
        self.shared.delete_expired()
    }

    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        self.shared.store.write().clear();
    }

    // == Status ==
    /// Returns a snapshot of capacity, size and counters.
    pub fn status(&self) -> CacheStatus {
        let store = self.shared.store.read();
        let counters = &self.shared.counters;
        CacheStatus {
            capacity: store.capacity(),
            current_size: store.len(),
            total_gets: counters.gets(),
            total_hits: counters.hits(),
            evictions: counters.evictions(),
            expirations: counters.expirations(),
        }
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.shared.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.shared.store.read().capacity()
    }

    pub fn default_ttl(&self) -> Duration {
        self.shared.store.read().default_ttl()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.shared.store.read().keys().cloned().collect()
    }

    // == Shutdown ==
    /// Stops the sweeper and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        if let Some(sweeper) = self.sweeper.take() {
            if let Err(err) = sweeper.await {
                warn!("Expiration sweeper ended abnormally: {}", err);
            }
        }
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}
