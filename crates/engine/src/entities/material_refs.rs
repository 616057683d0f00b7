//! Material reference lookups.

use std::sync::Arc;

use realmward_domain::{MaterialRef, MaterialRefId};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::EntityQueryPort;

use super::gateway::EntityGateway;

pub type MaterialRefCache = TtlCache<MaterialRefId, MaterialRef>;

/// Read-through access to material references by id.
pub struct MaterialRefs {
    gateway: EntityGateway<MaterialRefId, MaterialRef>,
}

impl MaterialRefs {
    pub const ENTITY: &'static str = "material_refs";

    pub fn new(
        cache: Arc<MaterialRefCache>,
        port: Arc<dyn EntityQueryPort<MaterialRefId, MaterialRef>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<MaterialRefId, MaterialRef>> = cache;
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |m| m.id),
        }
    }

    pub async fn get_by_id(
        &self,
        id: MaterialRefId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<MaterialRef> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: MaterialRefId) -> FetchResult<MaterialRef> {
        self.gateway.get_by_id(id, None).await
    }

    pub async fn refresh(&self, id: MaterialRefId) -> FetchResult<MaterialRef> {
        self.gateway.refresh(id).await
    }

    pub fn invalidate(&self, id: MaterialRefId) {
        self.gateway.invalidate(&id);
    }

    pub fn invalidate_all(&self) {
        self.gateway.invalidate_all();
    }
}
