//! Enchantment definition catalogue access.

use std::sync::Arc;

use realmward_domain::{EnchantmentDefinition, EnchantmentDefinitionId, Page, PagedQuery};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, EntityQueryPort};

use super::gateway::EntityGateway;

pub type EnchantmentDefinitionCache = TtlCache<EnchantmentDefinitionId, EnchantmentDefinition>;

pub struct EnchantmentDefinitions {
    gateway: EntityGateway<EnchantmentDefinitionId, EnchantmentDefinition>,
}

impl EnchantmentDefinitions {
    pub const ENTITY: &'static str = "enchantment_definitions";

    pub fn new(
        cache: Arc<EnchantmentDefinitionCache>,
        port: Arc<dyn EntityQueryPort<EnchantmentDefinitionId, EnchantmentDefinition>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<EnchantmentDefinitionId, EnchantmentDefinition>> = cache;
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |def| def.id),
        }
    }

    pub async fn get_by_id(
        &self,
        id: EnchantmentDefinitionId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<EnchantmentDefinition> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: EnchantmentDefinitionId) -> FetchResult<EnchantmentDefinition> {
        self.gateway.get_by_id(id, None).await
    }

    pub async fn refresh(&self, id: EnchantmentDefinitionId) -> FetchResult<EnchantmentDefinition> {
        self.gateway.refresh(id).await
    }

    pub async fn search(
        &self,
        query: &PagedQuery,
    ) -> Result<Page<EnchantmentDefinition>, ApiError> {
        self.gateway.search(query).await
    }

    pub async fn list(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<EnchantmentDefinition>, ApiError> {
        self.search(&PagedQuery::page(page_number, page_size)).await
    }

    pub fn invalidate(&self, id: EnchantmentDefinitionId) {
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
    use std::time::Duration;

    #[tokio::test]
    async fn invalidate_all_empties_the_catalogue_cache() {
        let id = EnchantmentDefinitionId::new(3);
        let port = Arc::new(
            FakeQueryPort::new().with(id, EnchantmentDefinition::new(id, "sharpness", "Sharpness")),
        );
        let definitions = EnchantmentDefinitions::new(
            Arc::new(EnchantmentDefinitionCache::new(Duration::from_secs(60))),
            port,
            DataAccessSettings::default(),
        );

        assert_eq!(definitions.get(id).await.status(), FetchStatus::MissFetched);
        definitions.invalidate_all();
        assert_eq!(
            definitions.get_by_id(id, Some(FetchPolicy::CacheOnly)).await.status(),
            FetchStatus::NotFound
        );
    }
}
