//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod handle;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use handle::Cache;
pub use lru::{LruList, NodeId};
pub use stats::{CacheCounters, CacheStatus};
pub use store::{CacheStore, Lookup};
