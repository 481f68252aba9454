//! Shared Cache Handle
//!
//! Thread-safe front for [`CacheStore`]. One mutex guards the entry map, the
//! recency queue and the table of in-flight computations together, so no
//! caller ever sees them out of step.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LockResult, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;

use crate::cache::{CacheStats, CacheStore, Clock};
use crate::config::Config;
use crate::error::Result;

/// Everything behind the cache lock.
#[derive(Debug)]
pub(crate) struct CacheState<V> {
    pub(crate) store: CacheStore<V>,
    /// Keys with a computation running in `get_or_set`. Waiters clone the
    /// receiver and are woken when the leader drops its sender.
    pub(crate) in_flight: HashMap<String, watch::Receiver<()>>,
}

// == Cache ==
/// Cloneable handle to a shared cache.
///
/// Clones point at the same storage. Construct one per owning service and
/// pass it to whatever needs it.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memo_cache::Cache;
///
/// let cache = Cache::new(2, Duration::from_secs(60)).unwrap();
/// cache.set("a", 1, None).unwrap();
/// cache.set("b", 2, None).unwrap();
/// assert_eq!(cache.get("a"), Some(1));
///
/// cache.set("c", 3, None).unwrap(); // evicts "b"
/// assert!(!cache.has("b"));
/// ```
pub struct Cache<V> {
    inner: Arc<Mutex<CacheState<V>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl<V> Cache<V> {
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with `InvalidArgument` if `capacity` or `default_ttl` is zero.
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Ok(Self::from_store(CacheStore::new(capacity, default_ttl)?))
    }

    /// Same as [`Cache::new`] but reads time from `clock`.
    pub fn with_clock(
        capacity: usize,
        default_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Ok(Self::from_store(CacheStore::with_clock(
            capacity,
            default_ttl,
            clock,
        )?))
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.default_ttl)
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState {
                store,
                in_flight: HashMap::new(),
            })),
        }
    }

    /// Locks the shared state.
    ///
    /// A poisoned lock means a panic interrupted a mutation and the map and
    /// recency queue may disagree, so it is treated as fatal.
    pub(crate) fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.inner.lock().expect("cache lock poisoned")
    }

    /// Raw lock result, for drop paths that must not panic.
    pub(crate) fn inner_lock(&self) -> LockResult<MutexGuard<'_, CacheState<V>>> {
        self.inner.lock()
    }

    // == Store Operations ==
    /// Inserts or replaces `key`. See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        self.lock().store.set(key, value, ttl)
    }

    /// Checks for a live entry, refreshing its recency like `get`.
    pub fn has(&self, key: &str) -> bool {
        self.lock().store.has(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().store.delete(key)
    }

    pub fn clear(&self) {
        self.lock().store.clear();
    }

    /// Removes every expired entry and returns how many went.
    pub fn eviction_sweep(&self) -> usize {
        self.lock().store.eviction_sweep()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }

    pub fn hit_rate(&self) -> f64 {
        self.lock().store.hit_rate()
    }

    /// Remaining lifetime of a live entry, without touching its recency.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.lock().store.ttl_remaining(key)
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }
}

impl<V: Clone> Cache<V> {
    /// Returns a clone of the live value for `key`, refreshing its recency.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().store.get(key)
    }
}
