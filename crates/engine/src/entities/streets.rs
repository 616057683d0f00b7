//! Street data access.

use std::sync::Arc;

use realmward_domain::{Page, PagedQuery, StreetDetail, StreetId};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, EntityQueryPort};

use super::gateway::EntityGateway;

/// Id-only: streets are not bound to a region.
pub type StreetCache = TtlCache<StreetId, StreetDetail>;

/// Cache-aware street reads. The API offers no street writes.
pub struct Streets {
    gateway: EntityGateway<StreetId, StreetDetail>,
}

impl Streets {
    pub const ENTITY: &'static str = "streets";

    pub fn new(
        cache: Arc<StreetCache>,
        port: Arc<dyn EntityQueryPort<StreetId, StreetDetail>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<StreetId, StreetDetail>> = cache;
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |street| street.id),
        }
    }

    pub async fn get_by_id(
        &self,
        id: StreetId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<StreetDetail> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: StreetId) -> FetchResult<StreetDetail> {
        self.gateway.get_by_id(id, None).await
    }

    pub async fn refresh(&self, id: StreetId) -> FetchResult<StreetDetail> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<StreetDetail>, ApiError> {
        self.gateway.search(query).await
    }

    pub fn invalidate(&self, id: StreetId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }
}
