//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Restore store → Wire controller
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop controller loop → Save snapshot → Exit
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, Bootstrap};
