//! Integration Tests for the public cache API
//!
//! Exercises the cache the way a consuming service would: one shared handle,
//! direct reads and writes, cache-aside lookups and memoized functions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::{anyhow, Result};
use memo_cache::{spawn_sweep_task, Cache, CacheError, Config, ManualClock};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

static TRACING: Once = Once::new();

/// Installs a test subscriber once; filter with RUST_LOG=memo_cache=debug.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn cache_with_clock<V>(capacity: usize) -> (Cache<V>, ManualClock) {
    init_tracing();
    let clock = ManualClock::new(1_700_000_000_000);
    let cache = Cache::with_clock(capacity, Duration::from_secs(3600), Arc::new(clock.clone()))
        .expect("valid cache config");
    (cache, clock)
}

// == Store Behaviour ==

#[test]
fn test_capacity_invariant_holds_after_every_set() {
    let (cache, _) = cache_with_clock::<usize>(10);

    for i in 0..250 {
        assert_ok!(cache.set(format!("key-{}", i % 37), i, None));
        assert!(cache.len() <= 10);
    }

    assert_eq!(cache.stats().capacity, 10);
}

#[test]
fn test_expiry_correctness() {
    let (cache, clock) = cache_with_clock::<&str>(10);

    assert_ok!(cache.set("k", "v", Some(Duration::from_millis(100))));
    assert_eq!(cache.get("k"), Some("v"));

    clock.advance(Duration::from_millis(101));
    let size_before = cache.len();

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), size_before - 1);
}

#[test]
fn test_lru_order() {
    let (cache, _) = cache_with_clock::<i32>(2);

    assert_ok!(cache.set("a", 1, None));
    assert_ok!(cache.set("b", 2, None));
    assert_eq!(cache.get("a"), Some(1));
    assert_ok!(cache.set("c", 3, None));

    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_has_counts_as_a_read() {
    // Existence checks refresh recency exactly like get
    let (cache, _) = cache_with_clock::<i32>(2);

    assert_ok!(cache.set("a", 1, None));
    assert_ok!(cache.set("b", 2, None));
    assert!(cache.has("a"));
    assert_ok!(cache.set("c", 3, None));

    assert!(cache.has("a"));
    assert!(!cache.has("b"));
}

#[test]
fn test_idempotent_delete() {
    let (cache, _) = cache_with_clock::<i32>(10);
    assert_ok!(cache.set("present", 1, None));

    assert!(!cache.delete("missing"));
    assert_eq!(cache.len(), 1);

    assert!(cache.delete("present"));
    assert_eq!(cache.len(), 0);
    assert!(!cache.delete("present"));
}

#[test]
fn test_invalid_arguments_leave_state_unchanged() {
    let (cache, _) = cache_with_clock::<i32>(10);
    assert_ok!(cache.set("k", 1, None));

    let err = assert_err!(cache.set("k", 2, Some(Duration::ZERO)));
    assert!(matches!(err, CacheError::InvalidArgument(_)));
    assert_eq!(cache.get("k"), Some(1));

    assert_err!(Cache::<i32>::new(0, Duration::from_secs(1)));
    assert_err!(Cache::<i32>::new(1, Duration::ZERO));
}

#[test]
fn test_stats_report_unswept_expired_entries() {
    let (cache, clock) = cache_with_clock::<i32>(10);
    assert_ok!(cache.set("short", 1, Some(Duration::from_secs(1))));
    assert_ok!(cache.set("long", 2, None));

    clock.advance(Duration::from_secs(5));

    let stats = cache.stats();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.expired_not_swept, 1);

    assert_eq!(cache.eviction_sweep(), 1);
    let stats = cache.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.expired_not_swept, 0);
}

// == Cache-Aside ==

#[tokio::test]
async fn test_no_poison_on_failure() {
    let (cache, _) = cache_with_clock::<String>(10);

    let result: Result<String> = cache
        .get_or_set("k", || async { Err(anyhow!("upstream unavailable")) }, None)
        .await;

    assert!(result.is_err());
    assert_eq!(cache.get("k"), None);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_memoization_avoids_recomputation() {
    let (cache, _) = cache_with_clock::<u64>(10);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let slow_double = assert_ok!(cache.memoize(
        move |n: u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, anyhow::Error>(n * 2) }
        },
        |n: &u64| format!("double:{}", n),
        None,
    ));

    assert_eq!(slow_double.call(21).await.unwrap(), 42);
    assert_eq!(slow_double.call(21).await.unwrap(), 42);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_hit_rate_arithmetic() {
    let (cache, _) = cache_with_clock::<usize>(10);

    for i in 0..3 {
        let value: Result<usize> = cache
            .get_or_set(format!("k{}", i), || async move { Ok(i) }, None)
            .await;
        assert_eq!(value.unwrap(), i);
    }
    for i in 0..7 {
        let value: Result<usize> = cache
            .get_or_set(format!("k{}", i % 3), || async { Err(anyhow!("should hit")) }, None)
            .await;
        assert_eq!(value.unwrap(), i % 3);
    }

    let stats = cache.stats();
    assert_eq!((stats.misses, stats.hits), (3, 7));
    assert!((cache.hit_rate() - 0.7).abs() < 1e-12);
    assert!((stats.hit_rate - 0.7).abs() < 1e-12);
}

#[tokio::test]
async fn test_plain_reads_are_not_counted() {
    let (cache, _) = cache_with_clock::<i32>(10);
    assert_ok!(cache.set("k", 1, None));

    cache.get("k");
    cache.get("missing");
    cache.has("k");

    assert_eq!(cache.hit_rate(), 0.0);
    assert_eq!(cache.stats().hits + cache.stats().misses, 0);
}

#[tokio::test]
async fn test_get_or_set_recomputes_after_expiry() {
    let (cache, clock) = cache_with_clock::<u32>(10);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = calls.clone();
        let value: Result<u32> = cache
            .get_or_set(
                "token",
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                },
                Some(Duration::from_secs(30)),
            )
            .await;
        assert_eq!(value.unwrap(), 7);
        clock.advance(Duration::from_secs(31));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stampede_runs_compute_once() {
    let (cache, _) = cache_with_clock::<String>(10);
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_set(
                        "report",
                        || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, anyhow::Error>("expensive".to_string())
                        },
                        None,
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "expensive");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 15);
}

// == Configuration and Maintenance ==

#[tokio::test]
async fn test_config_driven_cache_with_sweeper() {
    init_tracing();
    let config = Config {
        capacity: 4,
        default_ttl: Duration::from_millis(20),
        sweep_interval: Some(Duration::from_millis(25)),
    };

    let cache: Cache<i32> = assert_ok!(Cache::from_config(&config));
    let interval = config.sweep_interval.expect("sweep configured");
    let handle = spawn_sweep_task(cache.clone(), interval);

    assert_ok!(cache.set("a", 1, None));
    assert_ok!(cache.set("b", 2, None));

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.len(), 0);
    handle.abort();
}
