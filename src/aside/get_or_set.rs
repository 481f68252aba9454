//! Get-or-compute
//!
//! Cache-aside lookups with in-flight deduplication: concurrent misses on one
//! key run the computation once and share its stored result.

use std::future::Future;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::cache::{validate_ttl, Cache};
use crate::error::CacheError;

/// Marks the caller that is computing `key`.
///
/// Dropping it clears the in-flight marker and closes the channel, which wakes
/// every waiter. That happens on success, on failure, on panic and when the
/// caller's future is dropped mid-computation.
struct InFlight<'a, V> {
    cache: &'a Cache<V>,
    key: &'a str,
    _done: watch::Sender<()>,
}

impl<V> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        self.cache
            .inner_lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(self.key);
    }
}

impl<V: Clone> Cache<V> {
    // == Get Or Set ==
    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// On a hit `compute` is never called. On a miss it is awaited without the
    /// cache lock held; an `Ok` value is stored with `ttl` (or the default TTL)
    /// before being returned, an `Err` is handed back untouched and nothing is
    /// written.
    ///
    /// If another caller is already computing the same key, this call waits
    /// for it and then looks again. When that computation failed, one of the
    /// waiters takes over and runs its own `compute`.
    ///
    /// Each call records one hit or one miss. `compute` must not call
    /// `get_or_set` for the same key on this cache: it would wait on itself.
    ///
    /// # Errors
    /// `E::from(CacheError::InvalidArgument)` for a zero `ttl`, checked before
    /// anything else happens, or whatever `compute` returned.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: impl Into<String>,
        compute: F,
        ttl: Option<Duration>,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: From<CacheError>,
    {
        if let Some(ttl) = ttl {
            validate_ttl(ttl)?;
        }
        let key = key.into();

        let _leader = loop {
            let mut done = {
                let mut state = self.lock();
                if let Some(value) = state.store.get(&key) {
                    state.store.record_hit();
                    return Ok(value);
                }

                match state.in_flight.get(&key) {
                    Some(pending) => pending.clone(),
                    None => {
                        let (tx, rx) = watch::channel(());
                        state.in_flight.insert(key.clone(), rx);
                        state.store.record_miss();
                        break InFlight {
                            cache: self,
                            key: &key,
                            _done: tx,
                        };
                    }
                }
            };

            debug!(key = %key, "waiting for in-flight computation");
            // The leader never sends; this resolves when its sender is dropped.
            let _ = done.changed().await;
        };

        let value = match compute().await {
            Ok(value) => value,
            Err(err) => {
                debug!(key = %key, "computation failed, nothing cached");
                return Err(err);
            }
        };

        {
            let mut state = self.lock();
            state.store.set(key.as_str(), value.clone(), ttl)?;
        }
        Ok(value)
    }
}
