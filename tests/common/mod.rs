//! Shared utilities for integration tests.

use std::sync::Arc;

use hc_reconciler::config::HealthCheckTemplate;
use hc_reconciler::controller::SyncController;
use hc_reconciler::healthcheck::{Reconciler, TemplateResolver};
use hc_reconciler::store::{CountingStore, InMemoryStore};

#[allow(dead_code)]
pub type Store = CountingStore<InMemoryStore>;

#[allow(dead_code)]
/// A reconciler over a fresh counting in-memory store with default templates.
pub fn reconciler() -> (Arc<Store>, Reconciler<Store>) {
    let store = Arc::new(CountingStore::new(InMemoryStore::new()));
    let reconciler = Reconciler::new(store.clone(), Arc::new(TemplateResolver::default()));
    (store, reconciler)
}

/// A sync controller over a fresh in-memory store.
#[allow(dead_code)]
pub fn controller() -> (InMemoryStore, Arc<SyncController<InMemoryStore>>) {
    let store = InMemoryStore::new();
    let reconciler = Reconciler::new(Arc::new(store.clone()), Arc::new(TemplateResolver::default()));
    (store, Arc::new(SyncController::new(reconciler)))
}

/// Default template with a different probe path.
#[allow(dead_code)]
pub fn template_with_path(path: &str) -> HealthCheckTemplate {
    HealthCheckTemplate {
        path: path.to_string(),
        ..HealthCheckTemplate::default()
    }
}
