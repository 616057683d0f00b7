//! Saved location access.

use std::sync::Arc;

use realmward_domain::{Location, LocationId, Page, PagedQuery};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, EntityQueryPort};

use super::gateway::EntityGateway;

pub type LocationCache = TtlCache<LocationId, Location>;

pub struct Locations {
    gateway: EntityGateway<LocationId, Location>,
}

impl Locations {
    pub const ENTITY: &'static str = "locations";

    pub fn new(
        cache: Arc<LocationCache>,
        port: Arc<dyn EntityQueryPort<LocationId, Location>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<LocationId, Location>> = cache;
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |loc| loc.id),
        }
    }

    pub async fn get_by_id(
        &self,
        id: LocationId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<Location> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: LocationId) -> FetchResult<Location> {
        self.gateway.get_by_id(id, None).await
    }

    pub async fn refresh(&self, id: LocationId) -> FetchResult<Location> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<Location>, ApiError> {
        self.gateway.search(query).await
    }

    pub fn invalidate(&self, id: LocationId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::FetchStatus;
    use crate::entities::gateway::fake::FakeQueryPort;
    use crate::infrastructure::retry::RetryPolicy;
    use std::time::Duration;

    type FakeLocations = FakeQueryPort<LocationId, Location>;

    fn spawn_point() -> Location {
        Location::new(LocationId::new(3)).at("world", 0.5, 70.0, 0.5)
    }

    fn setup(port: FakeLocations) -> (Locations, Arc<FakeLocations>) {
        let port = Arc::new(port);
        let locations = Locations::new(
            Arc::new(LocationCache::new(Duration::from_secs(60))),
            port.clone(),
            DataAccessSettings::default().with_retry_policy(RetryPolicy::no_retry()),
        );
        (locations, port)
    }

    #[tokio::test]
    async fn get_fetches_once_then_hits_cache() {
        let (locations, port) = setup(FakeQueryPort::new().with(LocationId::new(3), spawn_point()));

        let fetched = locations.get(LocationId::new(3)).await;
        assert_eq!(fetched.status(), FetchStatus::MissFetched);
        assert_eq!(
            fetched.value().and_then(Location::coordinates),
            Some((0.5, 70.0, 0.5))
        );
        assert_eq!(locations.get(LocationId::new(3)).await.status(), FetchStatus::Hit);
        assert_eq!(port.get_calls(), 1);
    }

    #[tokio::test]
    async fn api_failure_with_empty_cache_is_error() {
        let (locations, port) = setup(FakeQueryPort::new());
        port.fail_with(ApiError::status("http://api/Locations/3", 500, "boom"));

        let result = locations.get(LocationId::new(3)).await;
        assert_eq!(result.status(), FetchStatus::Error);
        assert_eq!(port.get_calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let (locations, port) = setup(FakeQueryPort::new().with(LocationId::new(3), spawn_point()));
        locations.get(LocationId::new(3)).await;
        locations.invalidate(LocationId::new(3));

        assert_eq!(locations.get(LocationId::new(3)).await.status(), FetchStatus::MissFetched);
        assert_eq!(port.get_calls(), 2);
    }
}
