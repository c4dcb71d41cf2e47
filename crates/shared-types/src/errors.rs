//! # Error Taxonomy
//!
//! Every subsystem error maps onto one `ErrorKind` so that a calling API layer
//! can decide on retries and status codes without matching on each crate's
//! error enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification shared by all subsystem errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Role or precondition violation.
    Forbidden,
    /// Illegal lifecycle edge.
    InvalidTransition,
    /// Malformed measurement payload.
    InvalidMlResult,
    /// Lost an optimistic-concurrency race.
    Conflict,
    /// Storage or network failure while publishing content.
    UploadFailed,
    /// Chain client could not accept the payload.
    ChainUnavailable,
    /// Referenced record does not exist.
    NotFound,
    /// Failure of a collaborator that fits no other kind.
    Internal,
}

impl ErrorKind {
    /// Whether the caller may retry the same request unchanged.
    ///
    /// `Conflict` requires a re-fetch before the retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::UploadFailed | ErrorKind::Conflict)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Forbidden => "ForbiddenError",
            ErrorKind::InvalidTransition => "InvalidTransition",
            ErrorKind::InvalidMlResult => "InvalidMLResult",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::UploadFailed => "UploadFailed",
            ErrorKind::ChainUnavailable => "ChainUnavailable",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}
