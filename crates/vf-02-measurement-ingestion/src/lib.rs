//! # vf-02-measurement-ingestion
//!
//! Ingestion boundary for externally computed biomass/carbon results.
//!
//! ## Role in System
//!
//! The measurement service runs outside this core and has already completed
//! by the time its JSON result arrives here. This crate is the only place
//! that looks at that JSON:
//!
//! ```text
//! Measurement service ──raw JSON──→ canonicalize ──→ validate ──→ MeasurementResult
//!                                        │               │
//!                                        └── conflicts ──┴──→ MeasurementError (InvalidMLResult)
//! ```
//!
//! ## Rules
//!
//! - `carbon_sequestration_kg >= 0`
//! - `study_area_ha > 0`
//! - every component `confidence` lies in `[0, 1]`
//! - a reported job `status`, if present, must be `"success"`
//!
//! ## Example
//!
//! ```rust,ignore
//! use vf_02_measurement_ingestion::MeasurementValidator;
//!
//! let result = MeasurementValidator::new().validate(&raw_json)?;
//! assert!(result.final_results.study_area_ha > 0.0);
//! ```

pub mod domain;
pub mod error;
pub mod metrics;

pub use domain::{canonicalize, MeasurementValidator, RawMeasurement, SUCCESS_STATUS};
pub use error::{IngestionResult, MeasurementError, Violation};
