//! Health check reconciliation.
//!
//! # Data Flow
//! ```text
//! ensure(port):
//!     template.rs resolves the desired spec (override or default)
//!     → naming.rs derives the name
//!     → reconciler.rs reads the store by name
//!     → create / update / no-op
//!
//! remove(name):
//!     reconciler.rs deletes by name
//!     → NotFound is reported, callers decide
//! ```
//!
//! # Design Decisions
//! - Names are a pure function of the port, so lookups are idempotent
//! - Store access goes through the `HealthCheckStore` trait only
//! - Synchronous; callers own retry and scheduling

pub mod error;
pub mod naming;
pub mod reconciler;
pub mod spec;
pub mod template;

pub use error::{ReconcileError, ReconcileResult};
pub use naming::Namer;
pub use reconciler::{EnsureOutcome, Reconciler};
pub use spec::{HealthCheckSpec, Protocol};
pub use template::TemplateResolver;
