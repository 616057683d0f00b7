//! Port implementations for [`HttpApiClient`].

use std::collections::HashMap;

use async_trait::async_trait;
use realmward_domain::{
    DistrictDetail, DistrictId, DomainId, DomainRegionQuery, DomainRegionSummary,
    EnchantmentDefinition, EnchantmentDefinitionId, HealthStatus, ItemBlueprint, ItemBlueprintId,
    Location, LocationId, MaterialRef, MaterialRefId, Page, PagedQuery, PlayerId, StreetDetail,
    StreetId, StructureDetail, StructureId, TownDetail, TownId, UserDetail, UserSummary,
};

use super::client::HttpApiClient;
use crate::infrastructure::ports::{
    ApiError, DomainsQueryPort, EntityQueryPort, HealthPort, UsersCommandPort, UsersQueryPort,
};

const TOWNS: &str = "/Towns";
const DISTRICTS: &str = "/Districts";
const STRUCTURES: &str = "/Structures";
const STREETS: &str = "/Streets";
const LOCATIONS: &str = "/Locations";
const MATERIAL_REFS: &str = "/MinecraftMaterialRefs";
const ITEM_BLUEPRINTS: &str = "/ItemBlueprints";
const ENCHANTMENT_DEFINITIONS: &str = "/EnchantmentDefinitions";
const DOMAINS_BY_REGION: &str = "/Domains/by-region";
const DOMAINS_REGION_DECISIONS: &str = "/Domains/search-region-decisions";
const USERS: &str = "/Users";
const HEALTH: &str = "/health";

/// `GET {base}/{id}` and `POST {base}/search` for one entity family.
macro_rules! entity_endpoints {
    ($id:ty, $value:ty, $base:expr) => {
        #[async_trait]
        impl EntityQueryPort<$id, $value> for HttpApiClient {
            async fn get_by_id(&self, id: $id) -> Result<Option<$value>, ApiError> {
                let url = self.url(&format!("{}/{}", $base, id));
                self.get_optional(&url).await
            }

            async fn search(&self, query: &PagedQuery) -> Result<Page<$value>, ApiError> {
                let url = self.url(&format!("{}/search", $base));
                self.post_json(&url, query).await
            }
        }
    };
}

entity_endpoints!(TownId, TownDetail, TOWNS);
entity_endpoints!(DistrictId, DistrictDetail, DISTRICTS);
entity_endpoints!(StructureId, StructureDetail, STRUCTURES);
entity_endpoints!(StreetId, StreetDetail, STREETS);
entity_endpoints!(LocationId, Location, LOCATIONS);
entity_endpoints!(MaterialRefId, MaterialRef, MATERIAL_REFS);
entity_endpoints!(ItemBlueprintId, ItemBlueprint, ITEM_BLUEPRINTS);
entity_endpoints!(EnchantmentDefinitionId, EnchantmentDefinition, ENCHANTMENT_DEFINITIONS);

#[async_trait]
impl DomainsQueryPort for HttpApiClient {
    async fn get_by_region_id(
        &self,
        region_id: &str,
    ) -> Result<Option<DomainRegionSummary>, ApiError> {
        let url = self.url_with_segment(DOMAINS_BY_REGION, region_id)?;
        self.get_optional(&url).await
    }

    async fn search_region_decisions(
        &self,
        query: &DomainRegionQuery,
    ) -> Result<HashMap<DomainId, DomainRegionSummary>, ApiError> {
        let url = self.url(DOMAINS_REGION_DECISIONS);
        self.post_json(&url, query).await
    }
}

#[async_trait]
impl UsersQueryPort for HttpApiClient {
    async fn get_by_uuid(&self, uuid: PlayerId) -> Result<Option<UserSummary>, ApiError> {
        let url = self.url(&format!("{USERS}/uuid/{}", uuid.as_uuid()));
        self.get_optional(&url).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserSummary>, ApiError> {
        let url = self.url_with_segment(&format!("{USERS}/username"), username)?;
        self.get_optional(&url).await
    }

    async fn search(&self, query: &PagedQuery) -> Result<Page<UserSummary>, ApiError> {
        let url = self.url(&format!("{USERS}/search"));
        self.post_json(&url, query).await
    }
}

#[async_trait]
impl UsersCommandPort for HttpApiClient {
    async fn create(&self, seed: &UserDetail) -> Result<Option<UserDetail>, ApiError> {
        let url = self.url(USERS);
        self.post_optional(&url, seed).await
    }
}

#[async_trait]
impl HealthPort for HttpApiClient {
    async fn get_health(&self) -> Result<Option<HealthStatus>, ApiError> {
        let url = self.url(HEALTH);
        self.get_optional(&url).await
    }
}
