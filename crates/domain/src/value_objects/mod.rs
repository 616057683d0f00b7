//! Value objects - immutable views derived from entity records

mod domain_snapshot;
mod region_transition;

pub use domain_snapshot::{DomainKey, DomainSnapshot, DomainType, RegionSnapshot};
pub use region_transition::{RegionTransitionDecision, TransitionType};
