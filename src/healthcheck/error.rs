//! Reconciliation error definitions.

use thiserror::Error;

use crate::store::{Operation, StoreError};

/// Errors returned by [`Reconciler`](crate::healthcheck::Reconciler) operations.
///
/// Every variant names the health check and the attempted store operation, so
/// callers can log or retry without further context.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Removal of a health check that does not exist.
    #[error("health check {name} not found")]
    NotFound { name: String },

    /// The store rejected creation (duplicate race, quota).
    #[error("failed to create health check {name}: {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The store rejected the update, e.g. the resource was deleted concurrently.
    #[error("failed to update health check {name}: {source}")]
    UpdateFailed {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Reading the current state failed for a reason other than absence.
    #[error("failed to get health check {name}: {source}")]
    LookupFailed {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Deletion failed for a reason other than absence.
    #[error("failed to delete health check {name}: {source}")]
    DeleteFailed {
        name: String,
        #[source]
        source: StoreError,
    },
}

impl ReconcileError {
    /// Name of the health check involved.
    pub fn name(&self) -> &str {
        match self {
            ReconcileError::NotFound { name }
            | ReconcileError::CreateFailed { name, .. }
            | ReconcileError::UpdateFailed { name, .. }
            | ReconcileError::LookupFailed { name, .. }
            | ReconcileError::DeleteFailed { name, .. } => name,
        }
    }

    /// Store operation that failed.
    pub fn operation(&self) -> Operation {
        match self {
            ReconcileError::CreateFailed { .. } => Operation::Create,
            ReconcileError::UpdateFailed { .. } => Operation::Update,
            ReconcileError::LookupFailed { .. } => Operation::Get,
            ReconcileError::NotFound { .. } | ReconcileError::DeleteFailed { .. } => Operation::Delete,
        }
    }

    /// True when the goal of a removal is already satisfied.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::NotFound { .. })
    }

    /// Underlying store error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ReconcileError::NotFound { .. } => None,
            ReconcileError::CreateFailed { source, .. }
            | ReconcileError::UpdateFailed { source, .. }
            | ReconcileError::LookupFailed { source, .. }
            | ReconcileError::DeleteFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
