//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Controller pass fails:
//!     → backoff.rs (exponential delay with jitter)
//!     → pass retried until max_attempts, then wait for next resync
//! ```
//!
//! # Design Decisions
//! - Retry lives in the controller, never inside the reconciler
//! - Jittered backoff avoids synchronized retries against the provider API

pub mod backoff;
