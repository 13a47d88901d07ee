//! LRU TTL Cache - a concurrency-safe in-process cache
//!
//! Bounds memory with least-recently-used eviction and staleness with
//! per-entry time-to-live, swept in the background on a tokio runtime.
//!
//! ```no_run
//! use std::time::Duration;
//! use lru_ttl_cache::{Cache, Ttl};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Cache::new(2, Duration::from_secs(5)).unwrap();
//!
//!     cache.set("a", 1);
//!     cache.set_with_ttl("b", 2, Duration::from_secs(3));
//!     cache.set_with_ttl("c", 3, Ttl::Never);
//!
//!     assert_eq!(cache.get("a"), None);
//!     assert_eq!(cache.get("c"), Some(3));
//!
//!     let status = cache.status();
//!     println!("{} / {} entries, hit rate {:.2}", status.current_size, status.capacity, status.hit_rate());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStatus, Ttl};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
