//! District data access.

use std::sync::Arc;

use realmward_domain::{Page, PagedQuery, DistrictDetail, DistrictId};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::ports::{ApiError, EntityQueryPort};
use crate::infrastructure::region_cache::RegionIndexedCache;

use super::gateway::EntityGateway;

pub type DistrictCache = RegionIndexedCache<DistrictId, DistrictDetail>;

/// Cache-aware district reads.
pub struct Districts {
    gateway: EntityGateway<DistrictId, DistrictDetail>,
    cache: Arc<DistrictCache>,
}

impl Districts {
    pub const ENTITY: &'static str = "districts";

    pub fn new(
        cache: Arc<DistrictCache>,
        port: Arc<dyn EntityQueryPort<DistrictId, DistrictDetail>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<DistrictId, DistrictDetail>> = cache.clone();
        Self {
            gateway: EntityGateway::new(
                backend,
                port,
                settings,
                Self::ENTITY,
                |district| district.id,
            ),
            cache,
        }
    }

    pub async fn get_by_id(
        &self,
        id: DistrictId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<DistrictDetail> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: DistrictId) -> FetchResult<DistrictDetail> {
        self.gateway.get_by_id(id, None).await
    }

    /// Cached district bound to a region. Never calls the API.
    pub fn get_by_region_id(&self, region_id: &str) -> FetchResult<DistrictDetail> {
        match self.cache.get_by_region_id(region_id) {
            Some(district) => FetchResult::hit(district),
            None => FetchResult::not_found(),
        }
    }

    pub async fn refresh(&self, id: DistrictId) -> FetchResult<DistrictDetail> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<DistrictDetail>, ApiError> {
        self.gateway.search(query).await
    }

    pub fn invalidate(&self, id: DistrictId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }

    pub fn cache(&self) -> &Arc<DistrictCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::FetchStatus;
    use crate::entities::gateway::fake::FakeQueryPort;
    use crate::infrastructure::retry::RetryPolicy;
    use std::time::{Duration, Instant};

    const TTL: Duration = Duration::from_secs(60);

    fn district(id: i32) -> DistrictDetail {
        DistrictDetail::new(DistrictId::new(id), "Market Ward")
            .with_region("market_ward")
            .in_town(realmward_domain::TownId::new(1), "Riverhold")
    }

    #[tokio::test]
    async fn stale_ok_serves_expired_district_when_api_is_down() {
        let cache = Arc::new(DistrictCache::new(TTL));
        cache
            .inner()
            .insert_at(DistrictId::new(4), district(4), Instant::now() - TTL * 2);
        let port = Arc::new(FakeQueryPort::new());
        port.fail_with(ApiError::timeout("http://api/districts/4"));
        let districts = Districts::new(
            cache,
            port.clone(),
            DataAccessSettings::default().with_retry_policy(RetryPolicy::no_retry()),
        );

        let result = districts.get_by_id(DistrictId::new(4), Some(FetchPolicy::StaleOk)).await;
        assert_eq!(result.status(), FetchStatus::StaleServed);
        assert_eq!(result.value().map(|d| d.name.as_str()), Some("Market Ward"));

        // Expired entries never satisfy the cache-only region lookup.
        assert_eq!(districts.get_by_region_id("market_ward").status(), FetchStatus::NotFound);
    }

    #[tokio::test]
    async fn stale_ok_degrades_to_cache_first_when_disallowed() {
        let port = Arc::new(FakeQueryPort::new());
        port.fail_with(ApiError::timeout("http://api/districts/4"));
        let cache = Arc::new(DistrictCache::new(TTL));
        cache
            .inner()
            .insert_at(DistrictId::new(4), district(4), Instant::now() - TTL * 2);
        let districts = Districts::new(
            cache,
            port,
            DataAccessSettings::default()
                .with_allow_stale(false)
                .with_retry_policy(RetryPolicy::no_retry()),
        );

        let result = districts.get_by_id(DistrictId::new(4), Some(FetchPolicy::StaleOk)).await;
        assert_eq!(result.status(), FetchStatus::Error);
    }
}
