//! Item blueprint catalogue access.

use std::sync::Arc;

use realmward_domain::{ItemBlueprint, ItemBlueprintId, Page, PagedQuery};

use crate::data_access::{DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, EntityQueryPort};

use super::gateway::EntityGateway;

pub type ItemBlueprintCache = TtlCache<ItemBlueprintId, ItemBlueprint>;

pub struct ItemBlueprints {
    gateway: EntityGateway<ItemBlueprintId, ItemBlueprint>,
}

impl ItemBlueprints {
    pub const ENTITY: &'static str = "item_blueprints";

    pub fn new(
        cache: Arc<ItemBlueprintCache>,
        port: Arc<dyn EntityQueryPort<ItemBlueprintId, ItemBlueprint>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<ItemBlueprintId, ItemBlueprint>> = cache;
        Self {
            gateway: EntityGateway::new(backend, port, settings, Self::ENTITY, |bp| bp.id),
        }
    }

    pub async fn get_by_id(
        &self,
        id: ItemBlueprintId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<ItemBlueprint> {
        self.gateway.get_by_id(id, policy).await
    }

    pub async fn get(&self, id: ItemBlueprintId) -> FetchResult<ItemBlueprint> {
        self.gateway.get_by_id(id, None).await
    }

    pub async fn refresh(&self, id: ItemBlueprintId) -> FetchResult<ItemBlueprint> {
        self.gateway.refresh(id).await
    }

    pub async fn search(&self, query: &PagedQuery) -> Result<Page<ItemBlueprint>, ApiError> {
        self.gateway.search(query).await
    }

    /// One page of the catalogue with no filters.
    pub async fn list(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<ItemBlueprint>, ApiError> {
        self.search(&PagedQuery::page(page_number, page_size)).await
    }

    pub fn invalidate(&self, id: ItemBlueprintId) {
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

    #[tokio::test]
    async fn list_warms_cache_for_later_lookups() {
        let sword = ItemBlueprint::new(ItemBlueprintId::new(1), "Iron Sword");
        let shield = ItemBlueprint::new(ItemBlueprintId::new(2), "Oak Shield");
        let port = Arc::new(
            FakeQueryPort::new()
                .with(sword.id, sword)
                .with(shield.id, shield),
        );
        let blueprints = ItemBlueprints::new(
            Arc::new(ItemBlueprintCache::new(Duration::from_secs(60))),
            port.clone(),
            DataAccessSettings::default().with_retry_policy(RetryPolicy::no_retry()),
        );

        let page = blueprints.list(1, 50).await.expect("list");
        assert_eq!(page.page_size, 50);
        assert_eq!(page.items.len(), 2);

        let sword = blueprints.get(ItemBlueprintId::new(1)).await;
        assert_eq!(sword.status(), FetchStatus::Hit);
        assert_eq!(port.get_calls(), 0);
        assert_eq!(port.search_calls(), 1);
    }

    #[tokio::test]
    async fn search_failure_is_returned_to_caller() {
        let port = Arc::new(FakeQueryPort::<ItemBlueprintId, ItemBlueprint>::new());
        port.fail_with(ApiError::status("http://api/item-blueprints/search", 500, "oops"));
        let blueprints = ItemBlueprints::new(
            Arc::new(ItemBlueprintCache::new(Duration::from_secs(60))),
            port,
            DataAccessSettings::default(),
        );

        let err = blueprints.list(1, 10).await.expect_err("search fails");
        assert_eq!(err.status_code(), Some(500));
    }
}
