//! Error types for the Project Lifecycle subsystem

use crate::domain::{Forbidden, InvalidTransition};
use crate::ports::outbound::RepositoryError;
use shared_types::{ErrorKind, ProjectId, ProjectStatus};
use thiserror::Error;
use vf_02_measurement_ingestion::MeasurementError;

#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error(transparent)]
    InvalidMeasurement(#[from] MeasurementError),

    /// Another writer changed the record first. Re-fetch and retry.
    #[error("Conflict on project {project_id}: expected status {expected}, found {actual}")]
    Conflict {
        project_id: ProjectId,
        expected: ProjectStatus,
        actual: ProjectStatus,
    },

    /// Same status, but another write landed in between.
    #[error("Conflict on project {project_id}: expected revision {expected}, found {actual}")]
    StaleRevision {
        project_id: ProjectId,
        expected: u64,
        actual: u64,
    },

    #[error("Project not found: {project_id}")]
    NotFound { project_id: ProjectId },

    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::Validation { .. } => ErrorKind::Validation,
            LifecycleError::Forbidden(_) => ErrorKind::Forbidden,
            LifecycleError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            LifecycleError::InvalidMeasurement(e) => e.kind(),
            LifecycleError::Conflict { .. } | LifecycleError::StaleRevision { .. } => {
                ErrorKind::Conflict
            }
            LifecycleError::NotFound { .. } => ErrorKind::NotFound,
            LifecycleError::Storage { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        LifecycleError::Validation {
            reason: reason.into(),
        }
    }
}

impl From<RepositoryError> for LifecycleError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => LifecycleError::NotFound { project_id: id },
            RepositoryError::StatusMismatch {
                id,
                expected,
                actual,
            } => LifecycleError::Conflict {
                project_id: id,
                expected,
                actual,
            },
            RepositoryError::RevisionMismatch {
                id,
                expected,
                actual,
            } => LifecycleError::StaleRevision {
                project_id: id,
                expected,
                actual,
            },
            RepositoryError::AlreadyExists { id } => LifecycleError::Storage {
                reason: format!("duplicate project id {id}"),
            },
            RepositoryError::Backend { reason } => LifecycleError::Storage { reason },
        }
    }
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
