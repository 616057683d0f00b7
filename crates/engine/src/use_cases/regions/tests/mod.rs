//! Scenario tests for region transitions.
//!
//! Each scenario seeds a resolver with known domains and drives
//! [`RegionTransitionService::handle_region_transition`] end to end.

mod transition_scenarios;

use std::sync::Arc;

use realmward_domain::{DomainId, DomainSnapshot, DomainType};

use super::{RegionDomainResolver, RegionTransitionService};
use crate::infrastructure::ports::{GateControlPort, MockGateControlPort};

fn domain(id: i32, name: &str, region: &str, domain_type: DomainType) -> DomainSnapshot {
    DomainSnapshot::new(DomainId::new(id), name, region, domain_type)
}

fn resolver_with(domains: Vec<DomainSnapshot>) -> Arc<RegionDomainResolver> {
    let resolver = RegionDomainResolver::new();
    for domain in domains {
        resolver.register_domain(domain);
    }
    Arc::new(resolver)
}

fn service(
    resolver: Arc<RegionDomainResolver>,
    gates: Option<MockGateControlPort>,
) -> RegionTransitionService {
    let gates = gates.map(|g| Arc::new(g) as Arc<dyn GateControlPort>);
    RegionTransitionService::new(resolver, gates)
}
