//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the store, restoring the snapshot if one is configured
//! - Wire resolver, reconciler and controller together
//! - Adopt health checks found in the snapshot so stale ones are collected
//!
//! # Design Decisions
//! - Fail fast: an unreadable snapshot is fatal
//! - Subsystems initialize in order, not concurrently

use std::path::Path;
use std::sync::Arc;

use crate::config::ReconcilerConfig;
use crate::controller::{ControllerRunner, SyncController};
use crate::healthcheck::{Reconciler, TemplateResolver};
use crate::store::InMemoryStore;

/// Everything the binary needs to run.
pub struct Bootstrap {
    pub store: InMemoryStore,
    pub runner: ControllerRunner<InMemoryStore>,
}

/// Assemble the controller from a validated configuration.
pub fn bootstrap(config: &ReconcilerConfig) -> std::io::Result<Bootstrap> {
    let store = match &config.store.snapshot_path {
        Some(path) => InMemoryStore::load_from_file(Path::new(path))?,
        None => InMemoryStore::new(),
    };

    let resolver = Arc::new(TemplateResolver::from_config(config));
    let reconciler = Reconciler::new(Arc::new(store.clone()), resolver);
    let controller = Arc::new(SyncController::new(reconciler));

    let adopted = controller.adopt(store.names());
    if !adopted.is_empty() {
        tracing::info!(ports = ?adopted, "Adopted existing health checks");
    }

    let runner = ControllerRunner::new(controller, config.controller.clone());
    Ok(Bootstrap { store, runner })
}
