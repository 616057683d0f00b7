//! Domain entities - records served by the world API

mod district;
mod domain_region;
mod enchantment_definition;
mod health;
mod item_blueprint;
mod location;
mod material_ref;
mod street;
mod structure;
mod town;
mod user;

pub use district::{DistrictDetail, DistrictStructure, DistrictTown};
pub use domain_region::{DomainRegionQuery, DomainRegionSummary};
pub use enchantment_definition::EnchantmentDefinition;
pub use health::HealthStatus;
pub use item_blueprint::{BlueprintEnchantment, ItemBlueprint};
pub use location::Location;
pub use material_ref::MaterialRef;
pub use street::{StreetDetail, StreetDistrict, StreetStructure};
pub use structure::StructureDetail;
pub use town::{TownDetail, TownDistrict};
pub use user::{UserDetail, UserSummary};
