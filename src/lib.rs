//! Health check reconciliation engine for a cloud load-balancer ingress controller.

pub mod config;
pub mod controller;
pub mod healthcheck;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::ReconcilerConfig;
pub use healthcheck::{EnsureOutcome, HealthCheckSpec, ReconcileError, Reconciler, TemplateResolver};
pub use lifecycle::Shutdown;
pub use store::{HealthCheckStore, InMemoryStore, StoreError};
