//! Domain module for Measurement Ingestion
//!
//! - canonical: one-pass rewrite of field-name variants
//! - raw: the untrusted shape after canonicalization
//! - validator: range/presence checks producing `MeasurementResult`

pub mod canonical;
pub mod raw;
pub mod validator;

pub use canonical::canonicalize;
pub use raw::RawMeasurement;
pub use validator::{MeasurementValidator, SUCCESS_STATUS};
