//! Region resolution and transition use cases.

mod resolver;
mod transition;

#[cfg(test)]
mod tests;

pub use resolver::{RegionDomainResolver, DEFAULT_SNAPSHOT_TTL};
pub use transition::{RegionDelta, RegionTransitionService};

use std::sync::Arc;

/// Container for region use cases.
pub struct RegionUseCases {
    pub resolver: Arc<RegionDomainResolver>,
    pub transitions: Arc<RegionTransitionService>,
}

impl RegionUseCases {
    pub fn new(
        resolver: Arc<RegionDomainResolver>,
        transitions: Arc<RegionTransitionService>,
    ) -> Self {
        Self {
            resolver,
            transitions,
        }
    }
}
