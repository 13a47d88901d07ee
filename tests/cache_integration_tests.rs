//! Integration Tests for the Cache
//!
//! Exercises the public API end to end, including the background sweeper.
//! Time-sensitive tests run on tokio's paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lru_ttl_cache::{Cache, CacheConfig, CacheError, Ttl};
use tracing_subscriber::EnvFilter;

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "lru_ttl_cache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn create_test_cache<V>(capacity: usize, default_ttl: Duration) -> Cache<String, V>
where
    V: Clone + Send + Sync + 'static,
{
    init_tracing();
    Cache::new(capacity, default_ttl).unwrap()
}

// == Eviction ==

#[tokio::test]
async fn test_lru_evicts_oldest_write() {
    let cache = create_test_cache(2, Duration::from_secs(5));

    cache.set("a".to_string(), 1);
    cache.set("b".to_string(), 2);
    cache.set("c".to_string(), 3);

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_read_refreshes_recency() {
    let cache = create_test_cache(2, Duration::from_secs(5));

    cache.set("x".to_string(), 1);
    cache.set("y".to_string(), 2);
    assert_eq!(cache.get("x"), Some(1));
    cache.set("z".to_string(), 3);

    assert_eq!(cache.get("x"), Some(1), "refreshed key must survive");
    assert_eq!(cache.get("y"), None, "untouched key is the victim");
    assert_eq!(cache.get("z"), Some(3));
}

#[tokio::test]
async fn test_read_does_not_outrank_later_writes() {
    let cache = create_test_cache(2, Duration::from_secs(5));

    cache.set("x".to_string(), 1);
    assert_eq!(cache.get("x"), Some(1));
    cache.set("y".to_string(), 2);
    cache.set("z".to_string(), 3);

    // x was touched before y was written, so x is least recently used
    assert_eq!(cache.keys(), vec!["z".to_string(), "y".to_string()]);
    assert_eq!(cache.status().evictions, 1);
}

#[tokio::test]
async fn test_capacity_never_exceeded() {
    let cache = create_test_cache(16, Duration::ZERO);

    for i in 0..1000 {
        cache.set(format!("key{}", i), i);
        assert!(cache.len() <= 16);
    }
    assert_eq!(cache.status().evictions, 1000 - 16);
}

// == Expiration ==

#[tokio::test(start_paused = true)]
async fn test_ttl_expiration() {
    let cache = create_test_cache(2, Duration::from_secs(5));

    cache.set_with_ttl("k".to_string(), "v", Duration::from_secs(3));
    assert_eq!(cache.get("k"), Some("v"));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(cache.get("k"), None);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_boundaries() {
    let cache = create_test_cache(10, Duration::ZERO);

    cache.set_with_ttl("k".to_string(), 7, Duration::from_secs(2));

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert_eq!(cache.get("k"), Some(7));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cache.get("k"), None);
}

#[tokio::test(start_paused = true)]
async fn test_default_ttl_applies() {
    let cache = create_test_cache(10, Duration::from_secs(1));

    cache.set("default".to_string(), 1);
    cache.set_with_ttl("zero".to_string(), 2, Duration::ZERO);
    cache.set_with_ttl("never".to_string(), 3, Ttl::Never);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(cache.get("default"), None);
    assert_eq!(cache.get("zero"), None, "zero override falls back to the default");
    assert_eq!(cache.get("never"), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_expired_read_frees_slot() {
    let cache = create_test_cache(2, Duration::ZERO);

    cache.set_with_ttl("stale".to_string(), 1, Duration::from_millis(100));
    cache.set("fresh".to_string(), 2);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.get("stale"), None);
    assert_eq!(cache.len(), 1);

    // The freed slot absorbs the next write without evicting "fresh"
    cache.set("newer".to_string(), 3);
    assert_eq!(cache.get("fresh"), Some(2));
    assert_eq!(cache.status().evictions, 0);
    assert_eq!(cache.status().expirations, 1);
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_removes_unread_entries() {
    init_tracing();
    let config = CacheConfig::new(10, Duration::ZERO).with_sweep_interval(Duration::from_secs(1));
    let cache: Cache<String, u32> = Cache::with_config(config).unwrap();

    cache.set_with_ttl("short".to_string(), 1, Duration::from_millis(500));
    cache.set("forever".to_string(), 2);
    assert_eq!(cache.len(), 2);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Nobody read "short"; only the sweeper could have removed it
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.status().expirations, 1);
    assert_eq!(cache.status().total_gets, 0);
    assert_eq!(cache.peek("forever"), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_uses_default_period() {
    let cache = create_test_cache(10, Duration::from_secs(1));
    cache.set("k".to_string(), 1);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(cache.len(), 1, "no sweep before the first 5s tick");

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_reports_remaining() {
    let cache = create_test_cache(10, Duration::ZERO);
    cache.set_with_ttl("k".to_string(), 1, Duration::from_secs(10));
    cache.set("n".to_string(), 2);

    tokio::time::sleep(Duration::from_secs(4)).await;

    let remaining = cache.ttl("k").flatten().unwrap();
    assert!(remaining <= Duration::from_secs(6));
    assert!(remaining > Duration::from_millis(5900));
    assert_eq!(cache.ttl("n"), Some(None));
    assert_eq!(cache.ttl("missing"), None);
}

// == Delete ==

#[tokio::test]
async fn test_delete() {
    let cache = create_test_cache(2, Duration::from_secs(5));

    cache.set_with_ttl("myKey".to_string(), 1234, Duration::from_secs(2));
    assert_eq!(cache.get("myKey"), Some(1234));

    assert!(cache.delete("myKey"));
    assert_eq!(cache.get("myKey"), None);
}

#[tokio::test]
async fn test_delete_absent_key_is_noop() {
    let cache = create_test_cache(3, Duration::ZERO);
    cache.set("a".to_string(), 1);
    cache.set("b".to_string(), 2);
    let before = cache.keys();

    assert!(!cache.delete("missing"));
    assert_eq!(cache.keys(), before);
    assert_eq!(cache.len(), 2);
}

// == Status ==

#[tokio::test]
async fn test_status_snapshot() {
    let cache = create_test_cache(4, Duration::from_secs(60));
    cache.set("a".to_string(), 1);
    cache.set("b".to_string(), 2);

    cache.get("a");
    cache.get("a");
    cache.get("missing");

    let status = cache.status();
    assert_eq!(status.capacity, 4);
    assert_eq!(status.current_size, 2);
    assert_eq!(status.total_gets, 3);
    assert_eq!(status.total_hits, 2);
    assert_eq!(status.misses(), 1);
    assert!((status.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
}

// == Values ==

#[tokio::test]
async fn test_shared_values_are_not_copied() {
    let cache = create_test_cache(4, Duration::ZERO);
    let value = Arc::new(Mutex::new(vec![1]));
    cache.set("list".to_string(), Arc::clone(&value));

    value.lock().unwrap().push(2);

    let stored = cache.get("list").unwrap();
    assert!(Arc::ptr_eq(&stored, &value));
    assert_eq!(*stored.lock().unwrap(), vec![1, 2]);
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access() {
    let cache = Arc::new(create_test_cache(64, Duration::from_secs(60)));
    let mut handles = vec![];

    for worker in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::task::spawn_blocking(move || {
            for i in 0..500 {
                let key = format!("key{}", (worker * 31 + i) % 100);
                cache.set(key.clone(), i);
                cache.get(&key);
                if i % 7 == 0 {
                    cache.delete(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let status = cache.status();
    assert!(status.current_size <= 64);
    assert_eq!(status.total_gets, 8 * 500);
    assert_eq!(cache.keys().len(), status.current_size);
}

// == Lifecycle ==

#[test]
fn test_construction_requires_runtime() {
    let result = Cache::<String, u32>::new(2, Duration::from_secs(5));
    assert_eq!(result.err(), Some(CacheError::NoRuntime));
}

#[tokio::test]
async fn test_shutdown_completes() {
    let cache = create_test_cache::<u32>(2, Duration::from_secs(5));
    cache.set("a".to_string(), 1);
    cache.shutdown().await;
}
