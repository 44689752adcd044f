//! One reconciliation pass over a desired set of ports.
//!
//! # Responsibilities
//! - Ensure a health check for every desired port
//! - Remove health checks for ports ensured earlier but no longer desired
//! - Remember which ports this controller owns between passes
//!
//! # Design Decisions
//! - A failure on one port does not stop the rest of the pass
//! - `NotFound` during removal counts as removed
//! - Passes are serialized by the `owned` lock, giving per-name serialization

use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::healthcheck::{EnsureOutcome, ReconcileError, Reconciler};
use crate::store::HealthCheckStore;

/// A port that could not be reconciled during a pass.
#[derive(Debug)]
pub struct SyncFailure {
    pub port: u16,
    pub error: ReconcileError,
}

/// Summary of a single pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<u16>,
    pub updated: Vec<u16>,
    pub unchanged: Vec<u16>,
    pub removed: Vec<u16>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of store mutations the pass performed.
    pub fn changes(&self) -> usize {
        self.created.len() + self.updated.len() + self.removed.len()
    }
}

/// Tracks owned ports and converges the store on each pass.
#[derive(Debug)]
pub struct SyncController<S: ?Sized> {
    reconciler: Reconciler<S>,
    owned: Mutex<BTreeSet<u16>>,
}

impl<S: HealthCheckStore + ?Sized> SyncController<S> {
    pub fn new(reconciler: Reconciler<S>) -> Self {
        Self {
            reconciler,
            owned: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Take ownership of health checks that already exist, identified by name.
    ///
    /// Names the namer did not produce are ignored. Returns the adopted ports.
    pub fn adopt<I, N>(&self, names: I) -> Vec<u16>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let namer = self.reconciler.resolver().namer();
        let ports: Vec<u16> = names
            .into_iter()
            .filter_map(|name| namer.port_of(name.as_ref()))
            .collect();
        self.lock_owned().extend(ports.iter().copied());
        ports
    }

    /// Ports whose health checks this controller currently owns.
    pub fn owned(&self) -> BTreeSet<u16> {
        self.lock_owned().clone()
    }

    /// Converge the store on `desired`.
    pub fn sync(&self, desired: &BTreeSet<u16>) -> SyncReport {
        let mut owned = self.lock_owned();
        let mut report = SyncReport::default();

        for &port in desired {
            match self.reconciler.ensure(port) {
                Ok(outcome) => {
                    owned.insert(port);
                    match outcome {
                        EnsureOutcome::Created => report.created.push(port),
                        EnsureOutcome::Updated => report.updated.push(port),
                        EnsureOutcome::Unchanged => report.unchanged.push(port),
                    }
                }
                Err(error) => report.failures.push(SyncFailure { port, error }),
            }
        }

        let stale: Vec<u16> = owned.difference(desired).copied().collect();
        for port in stale {
            match self.reconciler.remove_port(port) {
                Ok(()) => {
                    owned.remove(&port);
                    report.removed.push(port);
                }
                Err(error) if error.is_not_found() => {
                    tracing::debug!(port, "Stale health check already gone");
                    owned.remove(&port);
                }
                Err(error) => report.failures.push(SyncFailure { port, error }),
            }
        }

        report
    }

    fn lock_owned(&self) -> std::sync::MutexGuard<'_, BTreeSet<u16>> {
        // Poisoning cannot leave the set half-updated.
        self.owned.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::healthcheck::TemplateResolver;
    use crate::store::{InMemoryStore, Operation, StoreError};
    use std::sync::Arc;

    fn controller() -> (InMemoryStore, SyncController<InMemoryStore>) {
        let store = InMemoryStore::new();
        let reconciler = Reconciler::new(Arc::new(store.clone()), Arc::new(TemplateResolver::default()));
        (store, SyncController::new(reconciler))
    }

    fn ports(list: &[u16]) -> BTreeSet<u16> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_sync_creates_then_garbage_collects() {
        let (store, controller) = controller();

        let report = controller.sync(&ports(&[80, 443]));
        assert_eq!(report.created, vec![80, 443]);
        assert_eq!(store.len(), 2);

        let report = controller.sync(&ports(&[80]));
        assert_eq!(report.unchanged, vec![80]);
        assert_eq!(report.removed, vec![443]);
        assert_eq!(store.names(), vec!["k8s-be-80-node-port".to_string()]);
        assert_eq!(controller.owned(), ports(&[80]));
    }

    #[test]
    fn test_externally_deleted_check_is_forgotten() {
        let (store, controller) = controller();
        controller.sync(&ports(&[80, 8080]));
        crate::store::HealthCheckStore::delete(&store, "k8s-be-8080-node-port").unwrap();

        let report = controller.sync(&ports(&[80]));
        assert!(report.is_success());
        assert!(report.removed.is_empty());
        assert_eq!(controller.owned(), ports(&[80]));
    }

    #[test]
    fn test_failed_removal_is_retried_next_pass() {
        let (store, controller) = controller();
        controller.sync(&ports(&[80]));

        store.inject_fault(Operation::Delete, StoreError::Unavailable("timeout".into()));
        let report = controller.sync(&ports(&[]));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].port, 80);
        assert_eq!(controller.owned(), ports(&[80]));

        let report = controller.sync(&ports(&[]));
        assert_eq!(report.removed, vec![80]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_adopt_ignores_foreign_names() {
        let (_store, controller) = controller();
        let adopted = controller.adopt(["k8s-be-80-node-port", "someone-elses-check"]);
        assert_eq!(adopted, vec![80]);
        assert_eq!(controller.owned(), ports(&[80]));
    }
}
