//! Periodic controller loop.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ControllerConfig, ReconcilerConfig};
use crate::controller::sync::{SyncController, SyncReport};
use crate::healthcheck::Namer;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::store::HealthCheckStore;

/// Runs reconciliation passes on a resync ticker and on config changes.
pub struct ControllerRunner<S: ?Sized> {
    controller: Arc<SyncController<S>>,
    settings: ControllerConfig,
    desired: BTreeSet<u16>,
}

impl<S: HealthCheckStore + ?Sized + 'static> ControllerRunner<S> {
    pub fn new(controller: Arc<SyncController<S>>, settings: ControllerConfig) -> Self {
        let desired = settings.ports.iter().copied().collect();
        Self {
            controller,
            settings,
            desired,
        }
    }

    pub fn controller(&self) -> &Arc<SyncController<S>> {
        &self.controller
    }

    pub fn desired(&self) -> &BTreeSet<u16> {
        &self.desired
    }

    /// Accept a reloaded configuration: templates, desired ports and loop settings.
    pub fn apply_config(&mut self, config: &ReconcilerConfig) {
        let resolver = self.controller.reconciler().resolver();
        if Namer::from_config(&config.naming) != *resolver.namer() {
            tracing::warn!("Naming changes require a restart, keeping current naming");
        }
        resolver.apply_config(config);
        self.settings = config.controller.clone();
        self.desired = self.settings.ports.iter().copied().collect();
        tracing::info!(
            ports = ?self.desired,
            overrides = config.overrides.len(),
            "Applied new configuration"
        );
    }

    /// Run one pass, retrying with backoff until it succeeds or attempts run out.
    pub async fn pass(&self) -> SyncReport {
        let pass_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_pass", %pass_id);
        self.pass_with_retries().instrument(span).await
    }

    async fn pass_with_retries(&self) -> SyncReport {
        metrics::record_desired(self.desired.len());
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let report = self.run_blocking().await;

            if report.is_success() {
                metrics::record_pass("ok");
                if report.changes() > 0 {
                    tracing::info!(
                        created = ?report.created,
                        updated = ?report.updated,
                        removed = ?report.removed,
                        attempt,
                        "Reconciliation pass applied changes"
                    );
                } else {
                    tracing::debug!(attempt, "Reconciliation pass found no drift");
                }
                return report;
            }

            for failure in &report.failures {
                tracing::warn!(
                    port = failure.port,
                    name = %failure.error.name(),
                    op = %failure.error.operation(),
                    error = %failure.error,
                    attempt,
                    "Port failed to reconcile"
                );
            }

            if attempt >= max_attempts {
                metrics::record_pass("failed");
                tracing::error!(
                    failures = report.failures.len(),
                    attempts = attempt,
                    "Reconciliation pass gave up until next resync"
                );
                return report;
            }

            let delay = calculate_backoff(attempt, self.settings.base_delay_ms, self.settings.max_delay_ms);
            tracing::info!(attempt, delay = ?delay, "Retrying reconciliation pass");
            time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn run_blocking(&self) -> SyncReport {
        let controller = self.controller.clone();
        let desired = self.desired.clone();
        match tokio::task::spawn_blocking(move || controller.sync(&desired)).await {
            Ok(report) => report,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                // Only happens while the runtime is shutting down.
                tracing::error!(error = %e, "Reconciliation pass cancelled");
                SyncReport::default()
            }
        }
    }

    /// Loop until shutdown. The first pass runs immediately.
    pub async fn run(
        mut self,
        mut config_updates: mpsc::UnboundedReceiver<ReconcilerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(
            ports = ?self.desired,
            resync_interval_secs = self.settings.resync_interval_secs,
            "Controller starting"
        );

        let mut ticker = time::interval(self.resync_interval());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.pass().await;
                }
                Some(config) = config_updates.recv() => {
                    self.apply_config(&config);
                    ticker = time::interval(self.resync_interval());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Controller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.settings.resync_interval_secs.max(1))
    }
}
