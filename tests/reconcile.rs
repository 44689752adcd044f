//! End-to-end reconciliation behaviour against the in-memory store.

use std::collections::BTreeMap;

use hc_reconciler::healthcheck::{EnsureOutcome, HealthCheckSpec, Protocol};
use hc_reconciler::store::{HealthCheckStore, Operation};

mod common;

#[test]
fn test_scenario_create_noop_remove() {
    let (store, reconciler) = common::reconciler();
    assert!(store.inner().is_empty());

    assert_eq!(reconciler.ensure(80).unwrap(), EnsureOutcome::Created);
    let stored = store.get("k8s-be-80-node-port").unwrap();
    assert_eq!(stored.protocol, Protocol::Http);
    assert_eq!(stored.path, "/");
    assert_eq!(stored.check_interval_sec, 10);

    assert_eq!(reconciler.ensure(80).unwrap(), EnsureOutcome::Unchanged);
    assert_eq!(store.calls(Operation::Create), 1);
    assert_eq!(store.calls(Operation::Update), 0);

    reconciler.remove("k8s-be-80-node-port").unwrap();
    assert!(reconciler.remove("k8s-be-80-node-port").unwrap_err().is_not_found());
    assert!(store.inner().is_empty());
}

#[test]
fn test_round_trip_matches_resolver() {
    let (store, reconciler) = common::reconciler();
    reconciler.resolver().set_override(8443, common::template_with_path("/livez"));

    for port in [80, 443, 8443] {
        reconciler.ensure(port).unwrap();
        let desired = reconciler.resolver().resolve(port);
        assert_eq!(store.get(&desired.name).unwrap(), desired);
    }
}

#[test]
fn test_repeated_ensure_issues_no_mutations() {
    let (store, reconciler) = common::reconciler();
    for port in [80, 443, 3000] {
        reconciler.ensure(port).unwrap();
    }
    store.reset();

    for _ in 0..5 {
        for port in [80, 443, 3000] {
            assert_eq!(reconciler.ensure(port).unwrap(), EnsureOutcome::Unchanged);
        }
    }
    assert_eq!(store.mutating_calls(), 0);
}

#[test]
fn test_drift_in_every_field_is_corrected() {
    let (store, reconciler) = common::reconciler();
    let desired = reconciler.resolver().resolve(80);

    let mutations: [fn(&mut HealthCheckSpec); 6] = [
        |s| s.protocol = Protocol::Tcp,
        |s| s.path = "/old".into(),
        |s| s.check_interval_sec = 60,
        |s| s.timeout_sec = 1,
        |s| s.healthy_threshold = 9,
        |s| s.unhealthy_threshold = 9,
    ];

    for mutate in mutations {
        let mut stale = desired.clone();
        mutate(&mut stale);
        let _ = store.inner().delete(&desired.name);
        store.inner().create(&stale).unwrap();
        store.reset();

        assert_eq!(reconciler.ensure(80).unwrap(), EnsureOutcome::Updated);
        assert_eq!(store.calls(Operation::Update), 1);
        assert_eq!(store.mutating_calls(), 1);
        assert_eq!(store.get(&desired.name).unwrap(), desired);
    }
}

/// Applies a fixed sequence of ensure/remove/template changes and checks the
/// store against the last desired state per name.
#[test]
fn test_convergence_after_mixed_operations() {
    let (store, reconciler) = common::reconciler();
    let namer = reconciler.resolver().namer().clone();
    let mut expected: BTreeMap<String, HealthCheckSpec> = BTreeMap::new();

    enum Step {
        Ensure(u16),
        Remove(u16),
        Override(u16, &'static str),
    }

    let steps = [
        Step::Ensure(80),
        Step::Ensure(443),
        Step::Ensure(80),
        Step::Override(443, "/ready"),
        Step::Ensure(443),
        Step::Remove(80),
        Step::Remove(80),
        Step::Ensure(8080),
        Step::Ensure(80),
        Step::Remove(443),
        Step::Override(80, "/v2/health"),
        Step::Ensure(80),
    ];

    for step in steps {
        match step {
            Step::Ensure(port) => {
                reconciler.ensure(port).unwrap();
                let desired = reconciler.resolver().resolve(port);
                expected.insert(desired.name.clone(), desired);
            }
            Step::Remove(port) => {
                let name = namer.name(port);
                let result = reconciler.remove(&name);
                if expected.remove(&name).is_some() {
                    result.unwrap();
                } else {
                    assert!(result.unwrap_err().is_not_found());
                }
            }
            Step::Override(port, path) => {
                reconciler.resolver().set_override(port, common::template_with_path(path));
            }
        }
    }

    let actual: BTreeMap<String, HealthCheckSpec> = store
        .inner()
        .snapshot()
        .into_iter()
        .map(|spec| (spec.name.clone(), spec))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(actual["k8s-be-80-node-port"].path, "/v2/health");
}
