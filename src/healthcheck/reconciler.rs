//! Drives stored health checks toward their desired templates.
//!
//! # Responsibilities
//! - Resolve the desired spec for a port
//! - Read the stored spec and apply the minimal mutation (create, update or nothing)
//! - Delete health checks by name
//!
//! # Design Decisions
//! - One store read per `ensure`; nothing cached between calls
//! - No retries: every store failure is returned with the name and operation
//! - Drift is judged on behaviour-affecting fields only

use std::sync::Arc;

use crate::healthcheck::error::{ReconcileError, ReconcileResult};
use crate::healthcheck::template::TemplateResolver;
use crate::observability::metrics;
use crate::store::{HealthCheckStore, StoreError};

/// What `ensure` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    Updated,
    Unchanged,
}

impl EnsureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnsureOutcome::Created => "created",
            EnsureOutcome::Updated => "updated",
            EnsureOutcome::Unchanged => "unchanged",
        }
    }
}

/// Reconciles health checks in `S` against a [`TemplateResolver`].
#[derive(Debug)]
pub struct Reconciler<S: ?Sized> {
    resolver: Arc<TemplateResolver>,
    store: Arc<S>,
}

impl<S: ?Sized> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: HealthCheckStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>, resolver: Arc<TemplateResolver>) -> Self {
        Self { resolver, store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn resolver(&self) -> &Arc<TemplateResolver> {
        &self.resolver
    }

    /// Make the stored health check for `port` match its template.
    pub fn ensure(&self, port: u16) -> ReconcileResult<EnsureOutcome> {
        let desired = self.resolver.resolve(port);
        let name = desired.name.clone();

        let actual = match self.store.get(&name) {
            Ok(actual) => Some(actual),
            Err(StoreError::NotFound(_)) => None,
            Err(source) => {
                tracing::warn!(name = %name, port, error = %source, "Health check lookup failed");
                metrics::record_operation("get", "error");
                return Err(ReconcileError::LookupFailed { name, source });
            }
        };

        let outcome = match actual {
            None => {
                if let Err(source) = self.store.create(&desired) {
                    tracing::warn!(name = %name, port, error = %source, "Health check create failed");
                    metrics::record_operation("create", "error");
                    return Err(ReconcileError::CreateFailed { name, source });
                }
                tracing::info!(
                    name = %name,
                    port,
                    protocol = %desired.protocol,
                    path = %desired.path,
                    "Created health check"
                );
                EnsureOutcome::Created
            }
            Some(actual) if !actual.behaviour_eq(&desired) => {
                let drift = actual.drift(&desired);
                if let Err(source) = self.store.update(&desired) {
                    tracing::warn!(name = %name, port, error = %source, "Health check update failed");
                    metrics::record_operation("update", "error");
                    return Err(ReconcileError::UpdateFailed { name, source });
                }
                tracing::info!(name = %name, port, drift = ?drift, "Updated health check");
                EnsureOutcome::Updated
            }
            Some(_) => {
                tracing::debug!(name = %name, port, "Health check up to date");
                EnsureOutcome::Unchanged
            }
        };

        metrics::record_operation("ensure", outcome.as_str());
        Ok(outcome)
    }

    /// Delete the health check called `name`.
    ///
    /// An absent health check is reported as [`ReconcileError::NotFound`];
    /// callers cleaning up usually treat that as success.
    pub fn remove(&self, name: &str) -> ReconcileResult<()> {
        match self.store.delete(name) {
            Ok(()) => {
                tracing::info!(name = %name, "Deleted health check");
                metrics::record_operation("delete", "ok");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(name = %name, "Health check already absent");
                metrics::record_operation("delete", "not_found");
                Err(ReconcileError::NotFound { name: name.to_string() })
            }
            Err(source) => {
                tracing::warn!(name = %name, error = %source, "Health check delete failed");
                metrics::record_operation("delete", "error");
                Err(ReconcileError::DeleteFailed {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    /// Delete the health check derived from `port`.
    pub fn remove_port(&self, port: u16) -> ReconcileResult<()> {
        self.remove(&self.resolver.namer().name(port))
    }
}
