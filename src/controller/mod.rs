//! Controller subsystem: the caller that drives reconciliation.
//!
//! # Data Flow
//! ```text
//! resync tick or config change
//!     → runner.rs (pass id span, retry with backoff)
//!     → sync.rs on the blocking pool
//!         → Reconciler::ensure for each desired port
//!         → Reconciler::remove_port for each owned port no longer desired
//!     → SyncReport
//! ```
//!
//! # Design Decisions
//! - One pass at a time; the store sees no concurrent mutation of a name
//! - Ownership is tracked locally, the store is never listed
//! - Failures never stop the loop; the next tick re-converges

pub mod runner;
pub mod sync;

pub use runner::ControllerRunner;
pub use sync::{SyncController, SyncFailure, SyncReport};
