//! Cache Store Module
//!
//! Single-threaded cache engine combining a HashMap index with an LRU list
//! and TTL expiration. Thread safety is layered on top by [`crate::Cache`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, LruList, NodeId, Ttl};

/// Upper bound on slots reserved up front for a bounded store.
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

// == Lookup Result ==
/// Outcome of a recency-updating read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Key present and live
    Hit(T),
    /// Key absent
    Missing,
    /// Key was present but its TTL had elapsed; the entry has been removed
    Expired,
}

#[cfg(test)]
impl<T> Lookup<T> {
    pub(crate) fn hit(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Missing | Lookup::Expired => None,
        }
    }

    pub(crate) fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// `index` maps every key to its node in `order`, and every node in `order`
/// is reachable from `index`.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to node lookup
    index: HashMap<K, NodeId>,
    /// Entries ordered most- to least-recently used
    order: LruList<CacheEntry<K, V>>,
    /// Maximum number of entries allowed (0 = unbounded)
    capacity: usize,
    /// TTL for writes without an explicit override (zero = never expires)
    default_ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, 0 for no limit
    /// * `default_ttl` - TTL applied when a write does not override it,
    ///   `Duration::ZERO` for no expiration
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let prealloc = capacity.min(MAX_PREALLOCATED_ENTRIES);
        Self {
            index: HashMap::with_capacity(prealloc),
            order: LruList::with_capacity(prealloc),
            capacity,
            default_ttl,
        }
    }

    // == Get ==
    /// Looks up a key, promoting it to most recently used on a hit.
    ///
    /// An entry found past its deadline is removed and reported as
    /// [`Lookup::Expired`].
    pub fn get<Q>(&mut self, key: &Q) -> Lookup<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            return Lookup::Missing;
        };

        let expired = match self.order.get(id) {
            Some(entry) => entry.is_expired(),
            None => return Lookup::Missing,
        };
        if expired {
            self.remove_node(id);
            return Lookup::Expired;
        }

        self.order.move_to_front(id);
        match self.order.get(id) {
            Some(entry) => Lookup::Hit(&entry.value),
            None => Lookup::Missing,
        }
    }

    // == Peek ==
    /// Returns a live value without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order
            .get(*id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| &entry.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek(key).is_some()
    }

    /// Remaining TTL of a live entry; `Some(None)` if it never expires.
    pub fn ttl<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order
            .get(*id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ttl_remaining())
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, value and expiration are replaced in place
    /// and the entry moves to the front. A new key that pushes the store past
    /// its capacity evicts exactly one entry, the least recently used, which
    /// is returned.
    pub fn set(&mut self, key: K, value: V, ttl: Ttl) -> Option<(K, V)> {
        let ttl = ttl.resolve(self.default_ttl);

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.replace(value, ttl);
                self.order.move_to_front(id);
                return None;
            }
        }

        let id = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, ttl));
        self.index.insert(key, id);

        if self.capacity != 0 && self.order.len() > self.capacity {
            return self.remove_oldest();
        }
        None
    }

    // == Delete ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.order.remove(id).map(|entry| entry.value)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry; no-op when empty.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    // == Delete Expired ==
    /// Removes all expired entries regardless of recency.
    ///
    /// Returns the number of entries removed.
    pub fn delete_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<NodeId> = self
            .order
            .handles()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        for id in expired {
            self.remove_node(id);
        }
        count
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter().map(|entry| &entry.key)
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are read or swept.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_node(&mut self, id: NodeId) -> Option<CacheEntry<K, V>> {
        let entry = self.order.remove(id)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len(), "index/order size mismatch");
        for (key, id) in &self.index {
            let entry = self.order.get(*id).expect("index points at a free slot");
            assert!(entry.key == *key, "index points at the wrong entry");
        }
        assert_eq!(self.order.iter().count(), self.order.len(), "broken links");
        if self.capacity != 0 {
            assert!(self.order.len() <= self.capacity, "capacity exceeded");
        }
    }
}
