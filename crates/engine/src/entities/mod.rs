//! Per-entity gateways over the world API.
//!
//! Each gateway owns one cache and one query port and exposes the fetch
//! policies of [`crate::data_access`] under entity-specific names.

pub mod districts;
pub mod domains;
pub mod enchantment_definitions;
mod gateway;
pub mod health;
pub mod item_blueprints;
pub mod locations;
pub mod material_refs;
pub mod streets;
pub mod structures;
pub mod towns;
pub mod users;

pub use districts::{DistrictCache, Districts};
pub use domains::{DomainCache, Domains};
pub use enchantment_definitions::{EnchantmentDefinitionCache, EnchantmentDefinitions};
pub use gateway::EntityGateway;
pub use health::{Health, HealthCache, HEALTH_KEY};
pub use item_blueprints::{ItemBlueprintCache, ItemBlueprints};
pub use locations::{LocationCache, Locations};
pub use material_refs::{MaterialRefCache, MaterialRefs};
pub use streets::{StreetCache, Streets};
pub use structures::{StructureCache, Structures};
pub use towns::{TownCache, Towns};
pub use users::{UserCache, Users};

#[cfg(test)]
pub(crate) use gateway::fake;
