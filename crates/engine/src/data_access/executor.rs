//! Generic fetch-policy executor shared by every entity gateway.
//!
//! Each call is split into a cache step, an optional remote step run through
//! the retry policy, and a settle step that folds the remote outcome back
//! into a [`FetchResult`]. The blocking and async entry points share the
//! cache and settle steps, so they produce the same outcome for the same
//! inputs.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::ports::ApiError;
use crate::infrastructure::retry::RetryPolicy;

use super::{FetchPolicy, FetchResult};

/// Orchestrates cache and API access for one entity type.
///
/// Concurrent misses on the same key are not coalesced: each caller fetches
/// on its own and the last write to the cache wins.
pub struct DataAccessExecutor<K, V> {
    cache: Arc<dyn CacheBackend<K, V>>,
    retry_policy: RetryPolicy,
    entity: &'static str,
}

impl<K, V> DataAccessExecutor<K, V>
where
    K: Clone + fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(
        cache: Arc<dyn CacheBackend<K, V>>,
        retry_policy: RetryPolicy,
        entity: &'static str,
    ) -> Self {
        Self {
            cache,
            retry_policy,
            entity,
        }
    }

    /// Entity label used in log events.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn cache(&self) -> &Arc<dyn CacheBackend<K, V>> {
        &self.cache
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Run `policy` for `key`, calling `fetch` when the policy needs the API.
    ///
    /// `fetch` yields `Ok(None)` when the API has no such record. Blocks the
    /// calling thread for the remote call and every retry delay.
    pub fn fetch_blocking<F>(&self, key: &K, policy: FetchPolicy, fetch: F) -> FetchResult<V>
    where
        F: FnMut() -> Result<Option<V>, ApiError>,
    {
        if let Some(result) = self.read_cache_first(key, policy) {
            return result;
        }
        let remote = self.retry_policy.execute_blocking(self.entity, fetch);
        self.settle(key, policy, remote)
    }

    /// Async counterpart of [`Self::fetch_blocking`].
    ///
    /// Never blocks the runtime; retry delays are timer waits. Dropping the
    /// returned future abandons the remote call and any pending delay.
    pub async fn fetch<F, Fut>(&self, key: &K, policy: FetchPolicy, fetch: F) -> FetchResult<V>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<V>, ApiError>>,
    {
        if let Some(result) = self.read_cache_first(key, policy) {
            return result;
        }
        let remote = self.retry_policy.execute(self.entity, fetch).await;
        self.settle(key, policy, remote)
    }

    pub fn invalidate(&self, key: &K) {
        self.cache.invalidate(key);
        tracing::debug!(entity = self.entity, key = ?key, "Invalidated cache entry");
    }

    pub fn invalidate_all(&self) {
        self.cache.clear();
        tracing::debug!(entity = self.entity, "Cleared cache");
    }

    /// Store a value obtained outside the executor, e.g. after a write.
    pub fn prime(&self, key: K, value: V) {
        tracing::debug!(entity = self.entity, key = ?key, "Primed cache entry");
        self.cache.put(key, value);
    }

    /// Store one batch of records, e.g. a page of search results.
    pub fn prime_all(&self, entries: Vec<(K, V)>) {
        if entries.is_empty() {
            return;
        }
        tracing::debug!(entity = self.entity, count = entries.len(), "Primed cache batch");
        self.cache.put_all(entries);
    }

    /// Cache step. `Some` when the policy is already settled without the API.
    fn read_cache_first(&self, key: &K, policy: FetchPolicy) -> Option<FetchResult<V>> {
        match policy {
            FetchPolicy::CacheOnly => Some(match self.cache.get(key) {
                Some(value) => {
                    self.log_cache_hit(key);
                    FetchResult::hit(value)
                }
                None => {
                    self.log_cache_miss(key);
                    FetchResult::not_found()
                }
            }),
            FetchPolicy::CacheFirst | FetchPolicy::StaleOk => match self.cache.get(key) {
                Some(value) => {
                    self.log_cache_hit(key);
                    Some(FetchResult::hit(value))
                }
                None => {
                    self.log_cache_miss(key);
                    None
                }
            },
            FetchPolicy::ApiOnly | FetchPolicy::ApiThenCacheRefresh => None,
        }
    }

    /// Settle step: fold the remote outcome into a result, writing through on
    /// success and applying the policy's fallback otherwise.
    fn settle(
        &self,
        key: &K,
        policy: FetchPolicy,
        remote: Result<Option<V>, ApiError>,
    ) -> FetchResult<V> {
        match remote {
            Ok(Some(value)) => {
                tracing::info!(
                    entity = self.entity,
                    key = ?key,
                    policy = %policy,
                    "Fetched from API"
                );
                self.cache.put(key.clone(), value.clone());
                FetchResult::miss_fetched(value)
            }
            Ok(None) => {
                tracing::info!(
                    entity = self.entity,
                    key = ?key,
                    policy = %policy,
                    "Not found in API"
                );
                match policy {
                    FetchPolicy::ApiThenCacheRefresh => self.fresh_or(key, FetchResult::not_found),
                    FetchPolicy::StaleOk => self.stale_or(key, FetchResult::not_found),
                    _ => FetchResult::not_found(),
                }
            }
            Err(error) => {
                tracing::warn!(
                    entity = self.entity,
                    key = ?key,
                    policy = %policy,
                    error = %error,
                    "API fetch failed"
                );
                match policy {
                    FetchPolicy::ApiThenCacheRefresh => {
                        self.fresh_or(key, || FetchResult::error(error))
                    }
                    FetchPolicy::StaleOk => self.stale_or(key, || FetchResult::error(error)),
                    _ => FetchResult::error(error),
                }
            }
        }
    }

    fn fresh_or(&self, key: &K, otherwise: impl FnOnce() -> FetchResult<V>) -> FetchResult<V> {
        match self.cache.get(key) {
            Some(value) => {
                self.log_cache_hit(key);
                FetchResult::hit(value)
            }
            None => otherwise(),
        }
    }

    fn stale_or(&self, key: &K, otherwise: impl FnOnce() -> FetchResult<V>) -> FetchResult<V> {
        match self.cache.get_stale(key) {
            Some(value) => {
                tracing::warn!(entity = self.entity, key = ?key, "Serving stale cache entry");
                FetchResult::stale_served(value)
            }
            None => otherwise(),
        }
    }

    fn log_cache_hit(&self, key: &K) {
        tracing::debug!(entity = self.entity, key = ?key, "Cache hit");
    }

    fn log_cache_miss(&self, key: &K) {
        tracing::debug!(entity = self.entity, key = ?key, "Cache miss");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::{DataSource, FetchStatus};
    use crate::infrastructure::cache::TtlCache;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    const TTL: Duration = Duration::from_secs(60);

    fn setup() -> (Arc<TtlCache<u32, String>>, DataAccessExecutor<u32, String>) {
        let cache = Arc::new(TtlCache::new(TTL));
        let executor = DataAccessExecutor::new(
            cache.clone() as Arc<dyn CacheBackend<u32, String>>,
            RetryPolicy::no_retry(),
            "test",
        );
        (cache, executor)
    }

    fn put_stale(cache: &TtlCache<u32, String>, key: u32, value: &str) {
        cache.insert_at(key, value.to_string(), Instant::now() - TTL * 2);
    }

    fn permanent() -> ApiError {
        ApiError::status("http://api/things/1", 400, "bad request")
    }

    #[test]
    fn cache_only_never_calls_api() {
        let (cache, executor) = setup();
        let calls = AtomicU32::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("remote".to_string()))
        };

        let missing = executor.fetch_blocking(&1, FetchPolicy::CacheOnly, fetch);
        assert_eq!(missing.status(), FetchStatus::NotFound);

        cache.insert(1, "cached".to_string());
        let hit = executor.fetch_blocking(&1, FetchPolicy::CacheOnly, fetch);
        assert_eq!(hit.status(), FetchStatus::Hit);
        assert_eq!(hit.value().map(String::as_str), Some("cached"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cache_first_writes_through_on_miss() {
        let (cache, executor) = setup();
        let result = executor.fetch_blocking(&1, FetchPolicy::CacheFirst, || {
            Ok(Some("remote".to_string()))
        });

        assert_eq!(result, FetchResult::miss_fetched("remote".to_string()));
        assert_eq!(cache.get(&1), Some("remote".to_string()));
    }

    #[test]
    fn cache_first_hit_skips_api() {
        let (cache, executor) = setup();
        cache.insert(1, "cached".to_string());
        let result = executor.fetch_blocking(&1, FetchPolicy::CacheFirst, || {
            panic!("API must not be called on a hit")
        });
        assert_eq!(result.status(), FetchStatus::Hit);
    }

    #[test]
    fn cache_first_reports_not_found_and_error() {
        let (cache, executor) = setup();
        let missing = executor.fetch_blocking(&1, FetchPolicy::CacheFirst, || Ok(None));
        assert_eq!(missing.status(), FetchStatus::NotFound);
        assert!(cache.is_empty());

        let failed = executor.fetch_blocking(&1, FetchPolicy::CacheFirst, || Err(permanent()));
        assert_eq!(failed.status(), FetchStatus::Error);
        assert_eq!(failed.error_ref(), Some(&permanent()));
    }

    #[test]
    fn api_only_bypasses_fresh_cache_but_still_writes() {
        let (cache, executor) = setup();
        cache.insert(1, "cached".to_string());
        let result = executor.fetch_blocking(&1, FetchPolicy::ApiOnly, || {
            Ok(Some("remote".to_string()))
        });

        assert_eq!(result.status(), FetchStatus::MissFetched);
        assert_eq!(cache.get(&1), Some("remote".to_string()));
    }

    #[test]
    fn api_then_cache_falls_back_on_empty_and_failure() {
        let (cache, executor) = setup();
        cache.insert(1, "cached".to_string());

        let on_empty = executor.fetch_blocking(&1, FetchPolicy::ApiThenCacheRefresh, || Ok(None));
        assert_eq!(on_empty, FetchResult::hit("cached".to_string()));

        let on_failure =
            executor.fetch_blocking(&1, FetchPolicy::ApiThenCacheRefresh, || Err(permanent()));
        assert_eq!(on_failure, FetchResult::hit("cached".to_string()));

        let nothing = executor.fetch_blocking(&2, FetchPolicy::ApiThenCacheRefresh, || Ok(None));
        assert_eq!(nothing.status(), FetchStatus::NotFound);

        let error =
            executor.fetch_blocking(&2, FetchPolicy::ApiThenCacheRefresh, || Err(permanent()));
        assert_eq!(error.status(), FetchStatus::Error);
    }

    #[test]
    fn stale_ok_serves_stale_entry_when_api_fails() {
        let (cache, executor) = setup();
        put_stale(&cache, 1, "old");

        let result = executor.fetch_blocking(&1, FetchPolicy::StaleOk, || Err(permanent()));
        assert_eq!(result.status(), FetchStatus::StaleServed);
        assert_eq!(result.value().map(String::as_str), Some("old"));
        assert!(result.is_stale());
        assert_eq!(result.source(), DataSource::Cache);
    }

    #[test]
    fn stale_ok_serves_stale_entry_when_api_has_nothing() {
        let (cache, executor) = setup();
        put_stale(&cache, 1, "old");

        let result = executor.fetch_blocking(&1, FetchPolicy::StaleOk, || Ok(None));
        assert_eq!(result.status(), FetchStatus::StaleServed);

        let none = executor.fetch_blocking(&2, FetchPolicy::StaleOk, || Ok(None));
        assert_eq!(none.status(), FetchStatus::NotFound);

        let error = executor.fetch_blocking(&2, FetchPolicy::StaleOk, || Err(permanent()));
        assert_eq!(error.status(), FetchStatus::Error);
    }

    #[test]
    fn transient_failures_are_retried_before_settling() {
        let cache = Arc::new(TtlCache::new(TTL));
        let policy = RetryPolicy::builder()
            .max_attempts(3)
            .initial_delay(Duration::from_millis(1))
            .build()
            .expect("valid policy");
        let executor: DataAccessExecutor<u32, String> = DataAccessExecutor::new(
            cache.clone() as Arc<dyn CacheBackend<u32, String>>,
            policy,
            "test",
        );
        let calls = AtomicU32::new(0);

        let result = executor.fetch_blocking(&1, FetchPolicy::CacheFirst, || {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ApiError::timeout("http://api/things/1"))
            } else {
                Ok(Some("remote".to_string()))
            }
        });

        assert_eq!(result.status(), FetchStatus::MissFetched);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_and_prime_delegate_to_cache() {
        let (cache, executor) = setup();
        executor.prime(1, "one".to_string());
        executor.prime(2, "two".to_string());
        assert_eq!(cache.len(), 2);

        executor.invalidate(&1);
        assert_eq!(cache.get(&1), None);

        executor.invalidate_all();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn async_stale_ok_serves_stale_entry_when_api_fails() {
        let (cache, executor) = setup();
        put_stale(&cache, 1, "old");

        let result = executor
            .fetch(&1, FetchPolicy::StaleOk, || async { Err(permanent()) })
            .await;
        assert_eq!(result, FetchResult::stale_served("old".to_string()));
    }

    #[tokio::test]
    async fn async_cache_first_writes_through() {
        let (cache, executor) = setup();
        let result = executor
            .fetch(&9, FetchPolicy::CacheFirst, || async {
                Ok(Some("remote".to_string()))
            })
            .await;

        assert_eq!(result.status(), FetchStatus::MissFetched);
        assert_eq!(cache.get(&9), Some("remote".to_string()));
    }

    #[derive(Clone, Copy, Debug)]
    enum Remote {
        Value,
        Empty,
        Fails,
    }

    impl Remote {
        fn outcome(self) -> Result<Option<String>, ApiError> {
            match self {
                Remote::Value => Ok(Some("remote".to_string())),
                Remote::Empty => Ok(None),
                Remote::Fails => Err(permanent()),
            }
        }
    }

    #[derive(Clone, Copy, Debug)]
    enum Seed {
        Nothing,
        Fresh,
        Stale,
    }

    fn seeded(seed: Seed) -> (Arc<TtlCache<u32, String>>, DataAccessExecutor<u32, String>) {
        let (cache, executor) = setup();
        match seed {
            Seed::Nothing => {}
            Seed::Fresh => cache.insert(1, "cached".to_string()),
            Seed::Stale => put_stale(&cache, 1, "old"),
        }
        (cache, executor)
    }

    #[tokio::test]
    async fn blocking_and_async_agree_for_every_policy() {
        for policy in FetchPolicy::ALL {
            for seed in [Seed::Nothing, Seed::Fresh, Seed::Stale] {
                for remote in [Remote::Value, Remote::Empty, Remote::Fails] {
                    let (sync_cache, sync_exec) = seeded(seed);
                    let blocking = sync_exec.fetch_blocking(&1, policy, || remote.outcome());

                    let (async_cache, async_exec) = seeded(seed);
                    let non_blocking = async_exec
                        .fetch(&1, policy, || async move { remote.outcome() })
                        .await;

                    assert_eq!(
                        blocking, non_blocking,
                        "{policy} with {seed:?} cache and {remote:?} API"
                    );
                    assert_eq!(sync_cache.get_stale(&1), async_cache.get_stale(&1));
                }
            }
        }
    }
}
