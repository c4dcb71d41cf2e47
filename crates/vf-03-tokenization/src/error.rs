//! Error types for the Tokenization subsystem

use crate::domain::{AssemblyError, ConfigError, ContentId, MetadataError};
use crate::ports::outbound::ReadError;
use shared_types::{ErrorKind, ProjectId, ProjectStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Upload timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The store confirmed a different identifier than the bytes hash to.
    #[error("Store returned CID {returned}, expected {expected}")]
    CidMismatch {
        expected: ContentId,
        returned: ContentId,
    },

    #[error("Content not found: {cid}")]
    NotFound { cid: ContentId },

    #[error("Stored content does not hash to {cid}")]
    IntegrityMismatch { cid: ContentId },

    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::UploadFailed { .. }
            | PublishError::Timeout { .. }
            | PublishError::CidMismatch { .. } => ErrorKind::UploadFailed,
            PublishError::NotFound { .. } => ErrorKind::NotFound,
            PublishError::IntegrityMismatch { .. } | PublishError::Serialization { .. } => {
                ErrorKind::Internal
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MintError {
    #[error("Validation error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Metadata could not be built from the record. Serialization failures
    /// become `Internal`.
    #[error("Validation error: {0}")]
    Metadata(MetadataError),

    #[error("Forbidden: project {project_id} is {status}, only verified projects can be minted")]
    NotVerified {
        project_id: ProjectId,
        status: ProjectStatus,
    },

    #[error("Forbidden: project {project_id} has no measurement results")]
    MissingMeasurement { project_id: ProjectId },

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Chain unavailable: {reason}")]
    ChainUnavailable { reason: String },

    #[error("Project not found: {project_id}")]
    NotFound { project_id: ProjectId },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl MintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MintError::Assembly(_) | MintError::Config(_) => ErrorKind::Validation,
            MintError::Metadata(_) => ErrorKind::Validation,
            MintError::NotVerified { .. } | MintError::MissingMeasurement { .. } => {
                ErrorKind::Forbidden
            }
            MintError::Publish(e) => e.kind(),
            MintError::ChainUnavailable { .. } => ErrorKind::ChainUnavailable,
            MintError::NotFound { .. } => ErrorKind::NotFound,
            MintError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

impl From<MetadataError> for MintError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Serialization { .. } => MintError::Internal {
                reason: err.to_string(),
            },
            other => MintError::Metadata(other),
        }
    }
}

impl From<ReadError> for MintError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::NotFound { id } => MintError::NotFound { project_id: id },
            ReadError::Backend { reason } => MintError::Internal { reason },
        }
    }
}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Result type for mint operations
pub type MintResult<T> = Result<T, MintError>;
