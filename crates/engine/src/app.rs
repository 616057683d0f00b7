//! Application state and composition.

use std::sync::Arc;

use realmward_domain::{
    DistrictDetail, DistrictId, EnchantmentDefinition, EnchantmentDefinitionId, ItemBlueprint,
    ItemBlueprintId, Location, LocationId, MaterialRef, MaterialRefId, StreetDetail, StreetId,
    StructureDetail, StructureId, TownDetail, TownId,
};

use crate::entities::{
    DistrictCache, Districts, DomainCache, Domains, EnchantmentDefinitionCache,
    EnchantmentDefinitions, Health, HealthCache, ItemBlueprintCache, ItemBlueprints, LocationCache,
    Locations, MaterialRefCache, MaterialRefs, StreetCache, Streets, StructureCache, Structures,
    TownCache, Towns, UserCache, Users,
};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::http::HttpApiClient;
use crate::infrastructure::ports::{
    DomainsQueryPort, EntityQueryPort, GateControlPort, HealthPort, UsersCommandPort,
    UsersQueryPort,
};
use crate::use_cases::regions::{RegionDomainResolver, RegionTransitionService, RegionUseCases};

/// Remote collaborators the app is built from.
#[derive(Clone)]
pub struct ApiPorts {
    pub towns: Arc<dyn EntityQueryPort<TownId, TownDetail>>,
    pub districts: Arc<dyn EntityQueryPort<DistrictId, DistrictDetail>>,
    pub structures: Arc<dyn EntityQueryPort<StructureId, StructureDetail>>,
    pub streets: Arc<dyn EntityQueryPort<StreetId, StreetDetail>>,
    pub locations: Arc<dyn EntityQueryPort<LocationId, Location>>,
    pub material_refs: Arc<dyn EntityQueryPort<MaterialRefId, MaterialRef>>,
    pub item_blueprints: Arc<dyn EntityQueryPort<ItemBlueprintId, ItemBlueprint>>,
    pub enchantment_definitions:
        Arc<dyn EntityQueryPort<EnchantmentDefinitionId, EnchantmentDefinition>>,
    pub domains: Arc<dyn DomainsQueryPort>,
    pub users: Arc<dyn UsersQueryPort>,
    /// `None` disables account creation in [`Users::get_or_create`].
    pub user_commands: Option<Arc<dyn UsersCommandPort>>,
    pub health: Arc<dyn HealthPort>,
}

impl ApiPorts {
    /// Every port served by one HTTP client.
    pub fn http(client: HttpApiClient) -> Self {
        let client = Arc::new(client);
        Self {
            towns: client.clone(),
            districts: client.clone(),
            structures: client.clone(),
            streets: client.clone(),
            locations: client.clone(),
            material_refs: client.clone(),
            item_blueprints: client.clone(),
            enchantment_definitions: client.clone(),
            domains: client.clone(),
            users: client.clone(),
            user_commands: Some(client.clone()),
            health: client,
        }
    }
}

/// Main application state.
///
/// Owns one cache per entity family. The town, district and structure caches
/// are shared between their gateways and the region resolver, so anything a
/// gateway fetches is immediately resolvable by region.
pub struct App {
    pub config: EngineConfig,
    pub entities: Entities,
    pub use_cases: UseCases,
}

/// Container for the per-entity gateways.
pub struct Entities {
    pub towns: Arc<Towns>,
    pub districts: Arc<Districts>,
    pub structures: Arc<Structures>,
    pub streets: Arc<Streets>,
    pub locations: Arc<Locations>,
    pub material_refs: Arc<MaterialRefs>,
    pub item_blueprints: Arc<ItemBlueprints>,
    pub enchantment_definitions: Arc<EnchantmentDefinitions>,
    pub domains: Arc<Domains>,
    pub users: Arc<Users>,
    pub health: Arc<Health>,
}

/// Container for all use cases.
pub struct UseCases {
    pub regions: RegionUseCases,
}

impl App {
    pub fn new(
        config: EngineConfig,
        ports: ApiPorts,
        gate_control: Option<Arc<dyn GateControlPort>>,
    ) -> Self {
        let settings = config.data_access.clone();
        let entity_ttl = config.entity_cache_ttl;

        let town_cache = Arc::new(TownCache::new(entity_ttl));
        let district_cache = Arc::new(DistrictCache::new(entity_ttl));
        let structure_cache = Arc::new(StructureCache::new(entity_ttl));

        let entities = Entities {
            towns: Arc::new(Towns::new(town_cache.clone(), ports.towns, settings.clone())),
            districts: Arc::new(Districts::new(
                district_cache.clone(),
                ports.districts,
                settings.clone(),
            )),
            structures: Arc::new(Structures::new(
                structure_cache.clone(),
                ports.structures,
                settings.clone(),
            )),
            streets: Arc::new(Streets::new(
                Arc::new(StreetCache::new(entity_ttl)),
                ports.streets,
                settings.clone(),
            )),
            locations: Arc::new(Locations::new(
                Arc::new(LocationCache::new(entity_ttl)),
                ports.locations,
                settings.clone(),
            )),
            material_refs: Arc::new(MaterialRefs::new(
                Arc::new(MaterialRefCache::new(entity_ttl)),
                ports.material_refs,
                settings.clone(),
            )),
            item_blueprints: Arc::new(ItemBlueprints::new(
                Arc::new(ItemBlueprintCache::new(entity_ttl)),
                ports.item_blueprints,
                settings.clone(),
            )),
            enchantment_definitions: Arc::new(EnchantmentDefinitions::new(
                Arc::new(EnchantmentDefinitionCache::new(entity_ttl)),
                ports.enchantment_definitions,
                settings.clone(),
            )),
            domains: Arc::new(Domains::new(
                Arc::new(DomainCache::new(config.domain_cache_ttl)),
                ports.domains.clone(),
                settings.clone(),
            )),
            users: Arc::new(Users::new(
                Arc::new(UserCache::new(config.user_cache_ttl)),
                ports.users,
                ports.user_commands,
                settings.clone(),
            )),
            health: Arc::new(Health::new(
                Arc::new(HealthCache::new(config.domain_cache_ttl)),
                ports.health,
                settings,
            )),
        };

        let resolver = Arc::new(
            RegionDomainResolver::new()
                .with_shared_caches(town_cache, district_cache, structure_cache)
                .with_domains_api(ports.domains)
                .with_snapshot_ttl(config.domain_cache_ttl),
        );
        let transitions = Arc::new(RegionTransitionService::new(resolver.clone(), gate_control));

        tracing::info!(
            api = %config.api_base_url,
            default_policy = %config.data_access.default_policy(),
            gate_control = transitions.has_gate_control(),
            "App composed"
        );

        Self {
            config,
            entities,
            use_cases: UseCases {
                regions: RegionUseCases::new(resolver, transitions),
            },
        }
    }

    pub fn resolver(&self) -> &Arc<RegionDomainResolver> {
        &self.use_cases.regions.resolver
    }

    pub fn transitions(&self) -> &Arc<RegionTransitionService> {
        &self.use_cases.regions.transitions
    }
}
