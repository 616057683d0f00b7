use realmward_domain::{DomainId, DomainType, PlayerId, TransitionType};

use super::*;
use crate::infrastructure::ports::GateControlError;

#[tokio::test]
async fn entering_district_inside_current_town_names_the_district() {
    let resolver = resolver_with(vec![
        domain(1, "Riverhold", "town_a", DomainType::Town),
        domain(2, "district_x", "district_x", DomainType::District).with_policy(Some(true), None),
    ]);
    let service = service(resolver, None);

    let decision = service
        .handle_region_transition(PlayerId::new(), ["town_a"], ["town_a", "district_x"])
        .await;

    assert!(decision.movement_allowed());
    assert_eq!(decision.transition(), TransitionType::Enter);
    assert!(decision.message().unwrap_or_default().contains("district_x"));
}

#[tokio::test]
async fn denied_structure_exit_does_not_close_its_gate() {
    let resolver = resolver_with(vec![
        domain(11, "Gatehouse", "structure_gate_1", DomainType::Structure)
            .with_policy(None, Some(false)),
        domain(12, "Gatehouse Gate", "structure_gate_1_gate", DomainType::Gate),
    ]);
    let mut gates = MockGateControlPort::new();
    gates.expect_open_gate().never();
    gates.expect_close_gate().never();
    let service = service(resolver, Some(gates));

    let decision = service
        .handle_region_transition(
            PlayerId::new(),
            ["structure_gate_1", "structure_gate_1_gate"],
            Vec::<String>::new(),
        )
        .await;

    assert!(!decision.movement_allowed());
    assert_eq!(decision.transition(), TransitionType::Exit);
    assert_eq!(decision.message(), Some("You are not allowed to leave Gatehouse."));
}

#[tokio::test]
async fn entering_gate_opens_it_exactly_once() {
    let resolver = resolver_with(vec![
        domain(7, "North Gate", "gate_7", DomainType::Gate).with_policy(Some(true), None)
    ]);
    let subject = PlayerId::new();
    let mut gates = MockGateControlPort::new();
    gates
        .expect_open_gate()
        .withf(move |gate, actor| *gate == DomainId::new(7) && *actor == subject)
        .times(1)
        .returning(|_, _| Ok(()));
    gates.expect_close_gate().never();
    let service = service(resolver, Some(gates));

    let decision = service
        .handle_region_transition(subject, Vec::<String>::new(), ["gate_7"])
        .await;

    assert!(decision.movement_allowed());
    // Gates carry no message of their own.
    assert_eq!(decision.message(), None);
}

#[tokio::test]
async fn leaving_gate_closes_it() {
    let resolver = resolver_with(vec![domain(7, "North Gate", "gate_7", DomainType::Gate)]);
    let mut gates = MockGateControlPort::new();
    gates.expect_open_gate().never();
    gates
        .expect_close_gate()
        .withf(|gate, _| *gate == DomainId::new(7))
        .times(1)
        .returning(|_, _| Ok(()));
    let service = service(resolver, Some(gates));

    let decision = service
        .handle_region_transition(PlayerId::new(), ["gate_7"], Vec::<String>::new())
        .await;

    assert!(decision.movement_allowed());
}

#[tokio::test]
async fn gate_failure_does_not_change_the_decision() {
    let resolver = resolver_with(vec![
        domain(1, "Riverhold", "town_a", DomainType::Town),
        domain(7, "North Gate", "gate_7", DomainType::Gate),
    ]);
    let mut gates = MockGateControlPort::new();
    gates
        .expect_open_gate()
        .times(1)
        .returning(|gate, _| Err(GateControlError::UnknownGate(gate.to_string())));
    let service = service(resolver, Some(gates));

    let decision = service
        .handle_region_transition(PlayerId::new(), Vec::<String>::new(), ["town_a", "gate_7"])
        .await;

    assert!(decision.movement_allowed());
    assert_eq!(decision.message(), Some("You are now entering Riverhold."));
}

#[tokio::test]
async fn gates_are_ignored_without_gate_control() {
    let resolver = resolver_with(vec![domain(7, "North Gate", "gate_7", DomainType::Gate)]);
    let service = service(resolver, None);

    let decision = service
        .handle_region_transition(PlayerId::new(), Vec::<String>::new(), ["gate_7"])
        .await;

    assert!(decision.movement_allowed());
}

#[test]
fn multiple_entry_denials_always_report_highest_priority_domain() {
    let resolver = resolver_with(vec![
        domain(30, "Vault", "vault", DomainType::Structure).with_policy(Some(false), None),
        domain(20, "Slums", "slums", DomainType::District).with_policy(Some(false), None),
        domain(25, "Barracks", "barracks", DomainType::District).with_policy(Some(false), None),
    ]);
    let service = service(resolver, None);

    for order in [
        ["vault", "slums", "barracks"],
        ["barracks", "vault", "slums"],
        ["slums", "barracks", "vault"],
    ] {
        let decision = service.evaluate(Vec::<String>::new(), order);
        assert_eq!(decision.transition(), TransitionType::Enter);
        assert_eq!(decision.message(), Some("You are not allowed to enter Slums."));
    }
}

#[test]
fn multiple_exit_denials_follow_town_district_structure_order() {
    let resolver = resolver_with(vec![
        domain(3, "Vault", "vault", DomainType::Structure).with_policy(None, Some(false)),
        domain(2, "Docks", "docks", DomainType::District).with_policy(None, Some(false)),
        domain(1, "Riverhold", "town_a", DomainType::Town).with_policy(None, Some(false)),
    ]);
    let service = service(resolver, None);

    let decision = service.evaluate(["vault", "docks", "town_a"], Vec::<String>::new());

    assert_eq!(decision.transition(), TransitionType::Exit);
    assert_eq!(decision.message(), Some("You are not allowed to leave Riverhold."));
}

#[test]
fn unresolved_regions_are_ignored() {
    let resolver = resolver_with(vec![domain(1, "Riverhold", "town_a", DomainType::Town)]);
    let service = service(resolver, None);

    let decision = service.evaluate(["wilderness"], ["town_a", "unknown_region"]);

    assert_eq!(decision.message(), Some("You are now entering Riverhold."));
}

#[test]
fn evaluation_never_touches_the_api() {
    // No domains API is configured; an unresolved move is simply a no-op.
    let service = service(Arc::new(RegionDomainResolver::new()), None);

    let decision = service.evaluate(["a"], ["b"]);

    assert!(decision.movement_allowed());
    assert_eq!(decision.message(), None);
    assert_eq!(service.resolver().domain_cache_metrics().misses, 2);
}
