//! Controller loop tests.

use std::time::Duration;

use tokio::sync::mpsc;

use hc_reconciler::config::{ControllerConfig, OverrideConfig, ReconcilerConfig};
use hc_reconciler::controller::ControllerRunner;
use hc_reconciler::lifecycle::Shutdown;
use hc_reconciler::store::{HealthCheckStore, Operation, StoreError};

mod common;

fn settings(ports: &[u16]) -> ControllerConfig {
    ControllerConfig {
        ports: ports.to_vec(),
        resync_interval_secs: 3600,
        max_attempts: 3,
        base_delay_ms: 10,
        max_delay_ms: 50,
    }
}

#[tokio::test]
async fn test_pass_retries_transient_failure() {
    let (store, controller) = common::controller();
    store.inject_fault(Operation::Create, StoreError::Unavailable("503".into()));

    let runner = ControllerRunner::new(controller, settings(&[80, 443]));
    let report = runner.pass().await;

    assert!(report.is_success());
    assert_eq!(report.created, vec![80]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_pass_gives_up_after_max_attempts() {
    let (store, controller) = common::controller();
    let mut config = settings(&[80]);
    config.max_attempts = 1;
    store.inject_fault(Operation::Get, StoreError::Unavailable("503".into()));

    let runner = ControllerRunner::new(controller, config);
    let report = runner.pass().await;

    assert!(!report.is_success());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_run_converges_and_applies_reload() {
    let (store, controller) = common::controller();
    let runner = ControllerRunner::new(controller.clone(), settings(&[80, 443]));

    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(runner.run(updates_rx, shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        store.names(),
        vec!["k8s-be-443-node-port".to_string(), "k8s-be-80-node-port".to_string()]
    );

    let mut reloaded = ReconcilerConfig::default();
    reloaded.controller = settings(&[80]);
    reloaded.overrides.push(OverrideConfig {
        port: 80,
        template: common::template_with_path("/healthz"),
    });
    updates_tx.send(reloaded).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.names(), vec!["k8s-be-80-node-port".to_string()]);
    assert_eq!(store.get("k8s-be-80-node-port").unwrap().path, "/healthz");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("controller did not stop")
        .unwrap();
}
