//! Error types for the Measurement Ingestion subsystem

use shared_types::ErrorKind;
use std::fmt;
use thiserror::Error;

/// A single reason a measurement result was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// The service reported a non-success job status.
    NonSuccessStatus(String),
    /// A required field is absent or null.
    MissingField(&'static str),
    /// Two spellings of the same quantity carry different values.
    ConflictingAliases { field: &'static str },
    /// NaN or infinity.
    NonFinite { field: &'static str },
    /// Physical quantity below zero.
    Negative { field: &'static str, value: f64 },
    /// Study area must be strictly positive.
    NonPositiveStudyArea(f64),
    /// Component confidence outside [0, 1].
    ConfidenceOutOfRange { component: &'static str, value: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NonSuccessStatus(status) => {
                write!(f, "measurement job status is '{status}', expected 'success'")
            }
            Violation::MissingField(field) => write!(f, "missing required field {field}"),
            Violation::ConflictingAliases { field } => {
                write!(f, "conflicting values supplied for {field} under different names")
            }
            Violation::NonFinite { field } => write!(f, "{field} is not a finite number"),
            Violation::Negative { field, value } => write!(f, "{field} is negative: {value}"),
            Violation::NonPositiveStudyArea(value) => {
                write!(f, "study_area_ha must be > 0, got {value}")
            }
            Violation::ConfidenceOutOfRange { component, value } => {
                write!(f, "{component} confidence must lie in [0, 1], got {value}")
            }
        }
    }
}

/// Measurement ingestion errors. All of them surface as `InvalidMLResult`.
#[derive(Debug, Clone, Error)]
pub enum MeasurementError {
    /// Payload is not the expected JSON shape.
    #[error("Malformed measurement result: {reason}")]
    Malformed { reason: String },

    /// Payload parsed but failed range or presence checks.
    #[error("Invalid measurement result: {}", join(.violations))]
    Invalid { violations: Vec<Violation> },
}

impl MeasurementError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidMlResult
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            MeasurementError::Invalid { violations } => violations,
            MeasurementError::Malformed { .. } => &[],
        }
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for ingestion operations
pub type IngestionResult<T> = Result<T, MeasurementError>;
