//! Domain decisions keyed by external region id.

use std::collections::HashMap;
use std::sync::Arc;

use realmward_domain::common::non_blank;
use realmward_domain::{DomainId, DomainRegionQuery, DomainRegionSummary};

use crate::data_access::{DataAccessExecutor, DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, DomainsQueryPort};

pub type DomainCache = TtlCache<String, DomainRegionSummary>;

/// Cache-aware reads of region-to-domain decisions.
pub struct Domains {
    executor: DataAccessExecutor<String, DomainRegionSummary>,
    port: Arc<dyn DomainsQueryPort>,
    settings: DataAccessSettings,
}

impl Domains {
    pub const ENTITY: &'static str = "domains";

    pub fn new(
        cache: Arc<DomainCache>,
        port: Arc<dyn DomainsQueryPort>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<String, DomainRegionSummary>> = cache;
        Self {
            executor: DataAccessExecutor::new(
                backend,
                settings.retry_policy().clone(),
                Self::ENTITY,
            ),
            port,
            settings,
        }
    }

    pub async fn get_by_region_id(
        &self,
        region_id: &str,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<DomainRegionSummary> {
        let policy = self.settings.resolve_policy(policy);
        let key = region_id.to_string();
        self.executor
            .fetch(&key, policy, || {
                let port = Arc::clone(&self.port);
                let key = key.clone();
                async move { port.get_by_region_id(&key).await }
            })
            .await
    }

    pub async fn get(&self, region_id: &str) -> FetchResult<DomainRegionSummary> {
        self.get_by_region_id(region_id, None).await
    }

    pub async fn refresh(&self, region_id: &str) -> FetchResult<DomainRegionSummary> {
        self.get_by_region_id(region_id, Some(FetchPolicy::ApiOnly)).await
    }

    /// Batched search; every returned decision with a region is cached.
    pub async fn search_region_decisions(
        &self,
        query: &DomainRegionQuery,
    ) -> Result<HashMap<DomainId, DomainRegionSummary>, ApiError> {
        let decisions = self.port.search_region_decisions(query).await?;
        let regioned = decisions
            .values()
            .filter_map(|summary| {
                non_blank(summary.region_id.as_deref())
                    .map(|region| (region.to_string(), summary.clone()))
            })
            .collect();
        self.executor.prime_all(regioned);
        Ok(decisions)
    }

    pub fn invalidate(&self, region_id: &str) {
        self.executor.invalidate(&region_id.to_string());
    }

    pub fn invalidate_all(&self) {
        self.executor.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::FetchStatus;
    use crate::infrastructure::ports::MockDomainsQueryPort;
    use std::time::Duration;

    fn summary(id: i32, region: &str) -> DomainRegionSummary {
        DomainRegionSummary::new(DomainId::new(id), format!("Domain {id}"), region)
            .with_type("Town")
    }

    fn domains(port: MockDomainsQueryPort) -> Domains {
        domains_with_cache(port, Arc::new(DomainCache::new(Duration::from_secs(60))))
    }

    fn domains_with_cache(port: MockDomainsQueryPort, cache: Arc<DomainCache>) -> Domains {
        Domains::new(cache, Arc::new(port), DataAccessSettings::default())
    }

    #[tokio::test]
    async fn get_caches_by_region_id() {
        let mut port = MockDomainsQueryPort::new();
        port.expect_get_by_region_id()
            .withf(|region| region == "town_a")
            .times(1)
            .returning(|_| Ok(Some(summary(1, "town_a"))));
        let domains = domains(port);

        assert_eq!(domains.get("town_a").await.status(), FetchStatus::MissFetched);
        assert_eq!(domains.get("town_a").await.status(), FetchStatus::Hit);
    }

    #[tokio::test]
    async fn search_warms_cache_for_regioned_decisions() {
        let mut port = MockDomainsQueryPort::new();
        port.expect_search_region_decisions().times(1).returning(|_| {
            let mut found = HashMap::new();
            found.insert(DomainId::new(1), summary(1, "town_a"));
            let mut unbound = summary(2, "");
            unbound.region_id = None;
            found.insert(DomainId::new(2), unbound);
            Ok(found)
        });
        port.expect_get_by_region_id().never();
        let domains = domains(port);

        let found = domains
            .search_region_decisions(&DomainRegionQuery::with_hierarchy(["town_a"]))
            .await
            .expect("search");
        assert_eq!(found.len(), 2);
        assert_eq!(
            domains.get_by_region_id("town_a", Some(FetchPolicy::CacheOnly)).await.status(),
            FetchStatus::Hit
        );
    }

    #[tokio::test]
    async fn search_primes_regioned_decisions_as_one_batch() {
        let mut port = MockDomainsQueryPort::new();
        port.expect_search_region_decisions().times(1).returning(|_| {
            Ok([
                (DomainId::new(1), summary(1, "town_a")),
                (DomainId::new(2), summary(2, "district_x")),
                (DomainId::new(3), summary(3, " ")),
            ]
            .into_iter()
            .collect())
        });
        let cache = Arc::new(DomainCache::new(Duration::from_secs(60)));
        let domains = domains_with_cache(port, cache.clone());

        domains
            .search_region_decisions(&DomainRegionQuery::with_hierarchy(["town_a", "district_x"]))
            .await
            .expect("search");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.metrics().snapshot().puts, 2);
        assert!(cache.get(&"district_x".to_string()).is_some());
    }
}
