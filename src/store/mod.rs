//! Health check store boundary.
//!
//! # Data Flow
//! ```text
//! Reconciler
//!     → HealthCheckStore trait (create / get / update / delete)
//!         - memory.rs   (keyed in-memory map, snapshot file, fault injection)
//!         - counting.rs (decorator counting calls per operation)
//!         - a cloud provider client, outside this crate
//! ```
//!
//! # Design Decisions
//! - Calls are blocking; the store is the serialization point per name
//! - No retries at this layer
//! - Errors name the health check they concern

pub mod counting;
pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::healthcheck::HealthCheckSpec;

pub use counting::CountingStore;
pub use memory::InMemoryStore;

/// Errors reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No health check with this name.
    #[error("health check {0} not found")]
    NotFound(String),

    /// A health check with this name is already present.
    #[error("health check {0} already exists")]
    AlreadyExists(String),

    /// Backend failure unrelated to the resource's existence (quota, transport).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The four store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Whether the operation changes store contents.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Operation::Get)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted health check resources, keyed by name.
pub trait HealthCheckStore: Send + Sync {
    /// Insert a new health check. Fails with `AlreadyExists` if the name is taken.
    fn create(&self, spec: &HealthCheckSpec) -> StoreResult<()>;

    /// Fetch a health check by name. Fails with `NotFound` if absent.
    fn get(&self, name: &str) -> StoreResult<HealthCheckSpec>;

    /// Replace an existing health check. Fails with `NotFound` if absent.
    fn update(&self, spec: &HealthCheckSpec) -> StoreResult<()>;

    /// Remove a health check by name. Fails with `NotFound` if absent.
    fn delete(&self, name: &str) -> StoreResult<()>;
}
