//! realmward domain types.
//!
//! Plain records for the world hierarchy (towns, districts, structures,
//! gates), player accounts and the item catalogue, plus the immutable
//! snapshot and decision types produced by region resolution. No I/O lives
//! here; the engine crate owns caching, remote access and orchestration.

extern crate self as realmward_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use common::{Page, PagedQuery, SortDirection};

pub use entities::{
    BlueprintEnchantment, DistrictDetail, DistrictStructure, DistrictTown, DomainRegionQuery,
    DomainRegionSummary, EnchantmentDefinition, HealthStatus, ItemBlueprint, Location,
    MaterialRef, StreetDetail, StreetDistrict, StreetStructure, StructureDetail, TownDetail,
    TownDistrict, UserDetail, UserSummary,
};

pub use error::DomainError;

pub use ids::{
    DistrictId, DomainId, EnchantmentDefinitionId, ItemBlueprintId, LocationId, MaterialRefId,
    PlayerId, StreetId, StructureId, TownId, UserId,
};

pub use value_objects::{
    DomainKey, DomainSnapshot, DomainType, RegionSnapshot, RegionTransitionDecision,
    TransitionType,
};
