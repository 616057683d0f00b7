//! Generic gateway binding a [`DataAccessExecutor`] to one entity query port.

use std::fmt;
use std::sync::Arc;

use realmward_domain::{Page, PagedQuery};

use crate::data_access::{DataAccessExecutor, DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::ports::{ApiError, EntityQueryPort};

/// Cache-aware reads of one entity family keyed by `K`.
///
/// The per-entity gateways in this module wrap one of these and add the
/// lookups specific to their records.
pub struct EntityGateway<K, V> {
    executor: DataAccessExecutor<K, V>,
    port: Arc<dyn EntityQueryPort<K, V>>,
    settings: DataAccessSettings,
    key_of: fn(&V) -> K,
}

impl<K, V> EntityGateway<K, V>
where
    K: Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// `key_of` extracts the cache key from a record returned by `search`.
    pub fn new(
        cache: Arc<dyn CacheBackend<K, V>>,
        port: Arc<dyn EntityQueryPort<K, V>>,
        settings: DataAccessSettings,
        entity: &'static str,
        key_of: fn(&V) -> K,
    ) -> Self {
        let executor = DataAccessExecutor::new(cache, settings.retry_policy().clone(), entity);
        Self {
            executor,
            port,
            settings,
            key_of,
        }
    }

    /// Fetch by id; `None` uses the configured default policy.
    pub async fn get_by_id(&self, id: K, policy: Option<FetchPolicy>) -> FetchResult<V> {
        let policy = self.settings.resolve_policy(policy);
        let port = Arc::clone(&self.port);
        self.executor
            .fetch(&id, policy, || {
                let port = Arc::clone(&port);
                let id = id.clone();
                async move { port.get_by_id(id).await }
            })
            .await
    }

    /// Always reads from the API, ignoring the configured default.
    pub async fn refresh(&self, id: K) -> FetchResult<V> {
        self.get_by_id(id, Some(FetchPolicy::ApiOnly)).await
    }

    /// Search the API and warm the cache with every returned record.
    pub async fn search(&self, query: &PagedQuery) -> Result<Page<V>, ApiError> {
        let page = self.port.search(query).await?;
        self.executor.prime_all(
            page.items
                .iter()
                .map(|item| ((self.key_of)(item), item.clone()))
                .collect(),
        );
        tracing::debug!(
            entity = self.executor.entity(),
            items = page.items.len(),
            total = page.total_count,
            "Search warmed cache"
        );
        Ok(page)
    }

    pub fn invalidate(&self, id: &K) {
        self.executor.invalidate(id);
    }

    pub fn invalidate_all(&self) {
        self.executor.invalidate_all();
    }

    pub fn settings(&self) -> &DataAccessSettings {
        &self.settings
    }

    pub fn executor(&self) -> &DataAccessExecutor<K, V> {
        &self.executor
    }
}

/// In-memory [`EntityQueryPort`] for gateway and resolver tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::hash::Hash;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use realmward_domain::{Page, PagedQuery};

    use crate::infrastructure::ports::{ApiError, EntityQueryPort};

    pub(crate) struct FakeQueryPort<K, V> {
        records: Mutex<HashMap<K, V>>,
        failure: Mutex<Option<ApiError>>,
        get_calls: AtomicU32,
        search_calls: AtomicU32,
    }

    impl<K: Eq + Hash, V: Clone> FakeQueryPort<K, V> {
        pub(crate) fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                failure: Mutex::new(None),
                get_calls: AtomicU32::new(0),
                search_calls: AtomicU32::new(0),
            }
        }

        pub(crate) fn with(self, key: K, value: V) -> Self {
            self.records.lock().expect("lock").insert(key, value);
            self
        }

        pub(crate) fn fail_with(&self, error: ApiError) {
            *self.failure.lock().expect("lock") = Some(error);
        }

        pub(crate) fn get_calls(&self) -> u32 {
            self.get_calls.load(Ordering::SeqCst)
        }

        pub(crate) fn search_calls(&self) -> u32 {
            self.search_calls.load(Ordering::SeqCst)
        }

        fn failure(&self) -> Option<ApiError> {
            self.failure.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl<K, V> EntityQueryPort<K, V> for FakeQueryPort<K, V>
    where
        K: Eq + Hash + Ord + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        async fn get_by_id(&self, id: K) -> Result<Option<V>, ApiError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failure() {
                return Err(error);
            }
            Ok(self.records.lock().expect("lock").get(&id).cloned())
        }

        async fn search(&self, query: &PagedQuery) -> Result<Page<V>, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failure() {
                return Err(error);
            }
            let records = self.records.lock().expect("lock");
            let mut keys: Vec<&K> = records.keys().collect();
            keys.sort();
            let items: Vec<V> = keys.into_iter().map(|k| records[k].clone()).collect();
            Ok(Page {
                total_count: items.len() as u32,
                items,
                page_number: query.page_number,
                page_size: query.page_size,
            })
        }
    }
}
