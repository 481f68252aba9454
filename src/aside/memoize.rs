//! Memoization
//!
//! Wraps an async function so repeated calls with the same key are served
//! from the cache.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::cache::{validate_ttl, Cache};
use crate::error::{CacheError, Result};

// == Memoized ==
/// An async function whose results are cached by a derived key.
///
/// Built with [`Cache::memoize`]. Functions of several arguments take them as
/// a tuple.
pub struct Memoized<V, F, K> {
    cache: Cache<V>,
    func: F,
    key_fn: K,
    ttl: Option<Duration>,
}

impl<V, F, K> fmt::Debug for Memoized<V, F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<V: Clone> Cache<V> {
    // == Memoize ==
    /// Wraps `func` so that each call first derives a key with `key_fn` and
    /// then behaves like [`Cache::get_or_set`] for that key.
    ///
    /// `key_fn` has to map equal arguments to equal keys for the cached
    /// results to be meaningful.
    ///
    /// # Errors
    /// `InvalidArgument` if `ttl` is zero.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use memo_cache::Cache;
    ///
    /// # tokio_test::block_on(async {
    /// let cache: Cache<i64> = Cache::new(100, Duration::from_secs(60)).unwrap();
    /// let add = cache
    ///     .memoize(
    ///         |(a, b): (i64, i64)| async move { Ok::<_, anyhow::Error>(a + b) },
    ///         |(a, b): &(i64, i64)| format!("add:{}:{}", a, b),
    ///         None,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(add.call((2, 3)).await.unwrap(), 5);
    /// assert_eq!(cache.get("add:2:3"), Some(5));
    /// # });
    /// ```
    pub fn memoize<F, K>(
        &self,
        func: F,
        key_fn: K,
        ttl: Option<Duration>,
    ) -> Result<Memoized<V, F, K>> {
        if let Some(ttl) = ttl {
            validate_ttl(ttl)?;
        }
        Ok(Memoized {
            cache: self.clone(),
            func,
            key_fn,
            ttl,
        })
    }
}

impl<V: Clone, F, K> Memoized<V, F, K> {
    /// Calls the wrapped function through the cache.
    pub async fn call<A, Fut, E>(&self, args: A) -> std::result::Result<V, E>
    where
        K: Fn(&A) -> String,
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<CacheError>,
    {
        let key = (self.key_fn)(&args);
        self.cache
            .get_or_set(key, || (self.func)(args), self.ttl)
            .await
    }

    /// The cache backing this function.
    pub fn cache(&self) -> &Cache<V> {
        &self.cache
    }
}
