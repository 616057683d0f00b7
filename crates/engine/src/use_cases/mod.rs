//! Use cases - orchestration on top of the entity gateways.

pub mod regions;

pub use regions::{RegionDomainResolver, RegionTransitionService, RegionUseCases};
