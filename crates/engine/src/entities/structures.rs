//! Structure data access.

use std::sync::Arc;

use realmward_domain::{Page, PagedQuery, StructureDetail, StructureId};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::ports::{ApiError, EntityQueryPort};
use crate::infrastructure::region_cache::RegionIndexedCache;

use super::gateway::EntityGateway;

pub type StructureCache = RegionIndexedCache<StructureId, StructureDetail>;

/// Cache-aware structure reads.
pub struct Structures {
    gateway: EntityGateway<StructureId, StructureDetail>,
    cache: Arc<StructureCache>,
}

impl Structures {
    pub const ENTITY: &'static str = "structures";

    pub fn new(
        cache: Arc<StructureCache>,
        port: Arc<dyn EntityQueryPort<StructureId, StructureDetail>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<StructureId, StructureDetail>> = cache.clone();
        Self {
            gateway: EntityGateway::new(
                backend,
                port,
                settings,
                Self::ENTITY,
                |structure| structure.id,
            ),
            cache,
        }
    }

    pub async fn get_by_id(
        &self,
        id: StructureId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<StructureDetail> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: StructureId) -> FetchResult<StructureDetail> {
        self.gateway.get_by_id(id, None).await
    }

    /// Cached structure bound to a region. Never calls the API.
    pub fn get_by_region_id(&self, region_id: &str) -> FetchResult<StructureDetail> {
        match self.cache.get_by_region_id(region_id) {
            Some(structure) => FetchResult::hit(structure),
            None => FetchResult::not_found(),
        }
    }

    pub async fn refresh(&self, id: StructureId) -> FetchResult<StructureDetail> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<StructureDetail>, ApiError> {
        self.gateway.search(query).await
    }

    pub fn invalidate(&self, id: StructureId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }

    pub fn cache(&self) -> &Arc<StructureCache> {
        &self.cache
    }
}
