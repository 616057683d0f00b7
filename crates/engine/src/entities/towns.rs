//! Town data access.

use std::sync::Arc;

use realmward_domain::{Page, PagedQuery, TownDetail, TownId};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::ports::{ApiError, EntityQueryPort};
use crate::infrastructure::region_cache::RegionIndexedCache;

use super::gateway::EntityGateway;

pub type TownCache = RegionIndexedCache<TownId, TownDetail>;

/// Cache-aware town reads.
pub struct Towns {
    gateway: EntityGateway<TownId, TownDetail>,
    cache: Arc<TownCache>,
}

impl Towns {
    pub const ENTITY: &'static str = "towns";

    pub fn new(
        cache: Arc<TownCache>,
        port: Arc<dyn EntityQueryPort<TownId, TownDetail>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<TownId, TownDetail>> = cache.clone();
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |town| town.id),
            cache,
        }
    }

    pub async fn get_by_id(
        &self,
        id: TownId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<TownDetail> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: TownId) -> FetchResult<TownDetail> {
        self.gateway.get_by_id(id, None).await
    }

    /// Cached town bound to a region. Never calls the API.
    pub fn get_by_region_id(&self, region_id: &str) -> FetchResult<TownDetail> {
        match self.cache.get_by_region_id(region_id) {
            Some(town) => FetchResult::hit(town),
            None => FetchResult::not_found(),
        }
    }

    pub async fn refresh(&self, id: TownId) -> FetchResult<TownDetail> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<TownDetail>, ApiError> {
        self.gateway.search(query).await
    }

    pub fn invalidate(&self, id: TownId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }

    pub fn cache(&self) -> &Arc<TownCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::FetchStatus;
    use crate::entities::gateway::fake::FakeQueryPort;
    use crate::infrastructure::retry::RetryPolicy;
    use std::time::Duration;

    fn town(id: i32, region: &str) -> TownDetail {
        TownDetail::new(TownId::new(id), format!("Town {id}")).with_region(region)
    }

    type FakeTowns = FakeQueryPort<TownId, TownDetail>;

    fn setup(port: FakeTowns) -> (Towns, Arc<FakeTowns>) {
        let port = Arc::new(port);
        let towns = Towns::new(
            Arc::new(TownCache::new(Duration::from_secs(60))),
            port.clone(),
            DataAccessSettings::default().with_retry_policy(RetryPolicy::no_retry()),
        );
        (towns, port)
    }

    #[tokio::test]
    async fn get_fetches_once_then_hits_cache() {
        let (towns, port) = setup(FakeQueryPort::new().with(TownId::new(1), town(1, "town_a")));

        assert_eq!(towns.get(TownId::new(1)).await.status(), FetchStatus::MissFetched);
        assert_eq!(towns.get(TownId::new(1)).await.status(), FetchStatus::Hit);
        assert_eq!(port.get_calls(), 1);
    }

    #[tokio::test]
    async fn region_lookup_is_cache_only() {
        let (towns, port) = setup(FakeQueryPort::new().with(TownId::new(1), town(1, "town_a")));

        assert_eq!(towns.get_by_region_id("town_a").status(), FetchStatus::NotFound);
        towns.get(TownId::new(1)).await;
        assert_eq!(towns.get_by_region_id("town_a").status(), FetchStatus::Hit);
        assert_eq!(port.get_calls(), 1);
    }

    #[tokio::test]
    async fn refresh_forces_api_even_when_cached() {
        let (towns, port) = setup(FakeQueryPort::new().with(TownId::new(1), town(1, "town_a")));
        towns.get(TownId::new(1)).await;

        let refreshed = towns.refresh(TownId::new(1)).await;
        assert_eq!(refreshed.status(), FetchStatus::MissFetched);
        assert_eq!(port.get_calls(), 2);
    }

    #[tokio::test]
    async fn search_warms_cache_and_region_index() {
        let (towns, port) = setup(
            FakeQueryPort::new()
                .with(TownId::new(1), town(1, "town_a"))
                .with(TownId::new(2), town(2, "town_b")),
        );

        let page = towns.search(&PagedQuery::page(1, 10)).await.expect("search");
        assert_eq!(page.items.len(), 2);

        assert_eq!(
            towns.get_by_id(TownId::new(2), Some(FetchPolicy::CacheOnly)).await.status(),
            FetchStatus::Hit
        );
        assert!(towns.get_by_region_id("town_b").has_value());
        assert_eq!(port.get_calls(), 0);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let (towns, port) = setup(FakeQueryPort::new().with(TownId::new(1), town(1, "town_a")));
        towns.get(TownId::new(1)).await;
        towns.invalidate(TownId::new(1));

        assert_eq!(towns.get(TownId::new(1)).await.status(), FetchStatus::MissFetched);
        assert_eq!(port.get_calls(), 2);
        assert!(towns.get_by_region_id("town_a").has_value());
    }
}
