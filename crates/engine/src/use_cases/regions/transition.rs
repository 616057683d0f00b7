//! Decides whether a subject may move between two sets of regions.

use std::sync::Arc;

use realmward_domain::{
    DomainSnapshot, DomainType, PlayerId, RegionSnapshot, RegionTransitionDecision,
    TransitionType,
};

use super::resolver::RegionDomainResolver;
use crate::infrastructure::ports::GateControlPort;

/// Domains gained and lost by one move, each in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDelta {
    pub entered: Vec<DomainSnapshot>,
    pub left: Vec<DomainSnapshot>,
}

impl RegionDelta {
    pub fn between(old: &RegionSnapshot, new: &RegionSnapshot) -> Self {
        Self {
            entered: new.difference(old),
            left: old.difference(new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty()
    }

    /// Evaluate entry and exit policy, then pick the message to show.
    pub fn decide(&self) -> RegionTransitionDecision {
        if let Some(domain) = self.entered.iter().find(|d| d.denies_entry()) {
            return RegionTransitionDecision::deny(
                TransitionType::Enter,
                format!("You are not allowed to enter {}.", domain.name),
            );
        }
        if let Some(domain) = self.left.iter().find(|d| d.denies_exit()) {
            return RegionTransitionDecision::deny(
                TransitionType::Exit,
                format!("You are not allowed to leave {}.", domain.name),
            );
        }
        self.town_message()
            .or_else(|| self.district_message())
            .or_else(|| self.structure_message())
            .unwrap_or_else(|| RegionTransitionDecision::allow(TransitionType::Exit))
    }

    fn town_message(&self) -> Option<RegionTransitionDecision> {
        if let Some(town) = first_of(&self.entered, &DomainType::Town) {
            return Some(RegionTransitionDecision::allow_with_message(
                TransitionType::Enter,
                format!("You are now entering {}.", town.name),
            ));
        }
        first_of(&self.left, &DomainType::Town).map(|town| {
            RegionTransitionDecision::allow_with_message(
                TransitionType::Exit,
                format!("You are now leaving {}.", town.name),
            )
        })
    }

    fn district_message(&self) -> Option<RegionTransitionDecision> {
        first_of(&self.entered, &DomainType::District).map(|district| {
            let message = match district.first_parent_name() {
                Some(parent) => format!("You are now entering {} * {} *", district.name, parent),
                None => format!("You are now entering {}.", district.name),
            };
            RegionTransitionDecision::allow_with_message(TransitionType::Enter, message)
        })
    }

    fn structure_message(&self) -> Option<RegionTransitionDecision> {
        first_of(&self.entered, &DomainType::Structure).map(|structure| {
            RegionTransitionDecision::allow_with_message(
                TransitionType::Enter,
                format!("You are now entering {}.", structure.name),
            )
        })
    }

    fn gates(domains: &[DomainSnapshot]) -> impl Iterator<Item = &DomainSnapshot> + '_ {
        domains.iter().filter(|d| d.domain_type == DomainType::Gate)
    }
}

fn first_of<'a>(domains: &'a [DomainSnapshot], kind: &DomainType) -> Option<&'a DomainSnapshot> {
    domains.iter().find(|d| &d.domain_type == kind)
}

/// Evaluates region transitions and drives gates on allowed moves.
///
/// Resolution is cache-only: the movement path never waits on the world API.
/// Warm the resolver ahead of time with
/// [`RegionDomainResolver::warm_cache`].
pub struct RegionTransitionService {
    resolver: Arc<RegionDomainResolver>,
    gate_control: Option<Arc<dyn GateControlPort>>,
}

impl RegionTransitionService {
    pub fn new(
        resolver: Arc<RegionDomainResolver>,
        gate_control: Option<Arc<dyn GateControlPort>>,
    ) -> Self {
        Self {
            resolver,
            gate_control,
        }
    }

    pub fn resolver(&self) -> &Arc<RegionDomainResolver> {
        &self.resolver
    }

    pub fn has_gate_control(&self) -> bool {
        self.gate_control.is_some()
    }

    /// Entered/left domains for a move, resolved from cache.
    pub fn delta<O, N, S, T>(&self, old_region_ids: O, new_region_ids: N) -> RegionDelta
    where
        O: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let old = self.resolver.resolve_regions(old_region_ids);
        let new = self.resolver.resolve_regions(new_region_ids);
        RegionDelta::between(&old, &new)
    }

    /// Decision only, without gate side effects.
    pub fn evaluate<O, N, S, T>(
        &self,
        old_region_ids: O,
        new_region_ids: N,
    ) -> RegionTransitionDecision
    where
        O: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.delta(old_region_ids, new_region_ids).decide()
    }

    /// Decide the move and, when it is allowed, open entered gates and close
    /// left ones for `subject`.
    ///
    /// Gate failures are logged and never change the decision.
    pub async fn handle_region_transition<O, N, S, T>(
        &self,
        subject: PlayerId,
        old_region_ids: O,
        new_region_ids: N,
    ) -> RegionTransitionDecision
    where
        O: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let delta = self.delta(old_region_ids, new_region_ids);
        let decision = delta.decide();

        tracing::info!(
            subject = %subject,
            entered = delta.entered.len(),
            left = delta.left.len(),
            allowed = decision.movement_allowed(),
            transition = ?decision.transition(),
            message = decision.message().unwrap_or_default(),
            "Region transition evaluated"
        );

        if decision.movement_allowed() {
            self.drive_gates(subject, &delta).await;
        }
        decision
    }

    async fn drive_gates(&self, subject: PlayerId, delta: &RegionDelta) {
        let Some(gates) = &self.gate_control else {
            return;
        };
        for gate in RegionDelta::gates(&delta.entered) {
            if let Err(e) = gates.open_gate(gate.id, subject).await {
                tracing::warn!(
                    gate_id = %gate.id,
                    gate = %gate.name,
                    error = %e,
                    "Failed to open gate"
                );
            }
        }
        for gate in RegionDelta::gates(&delta.left) {
            if let Err(e) = gates.close_gate(gate.id, subject).await {
                tracing::warn!(
                    gate_id = %gate.id,
                    gate = %gate.name,
                    error = %e,
                    "Failed to close gate"
                );
            }
        }
    }
}
