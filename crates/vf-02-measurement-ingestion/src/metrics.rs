//! # Ingestion Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! vf-02-measurement-ingestion = { path = "...", features = ["metrics"] }
//! ```
//!
//! - `ingestion_results_accepted_total` - Counter of accepted measurement results
//! - `ingestion_results_rejected_total` - Counter of refused results (by reason)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total measurement results accepted
    pub static ref RESULTS_ACCEPTED: IntCounter = register_int_counter!(
        "ingestion_results_accepted_total",
        "Total number of measurement results accepted"
    )
    .expect("Failed to create RESULTS_ACCEPTED metric");

    /// Total measurement results rejected, labeled by reason
    pub static ref RESULTS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "ingestion_results_rejected_total",
        "Total number of measurement results rejected",
        &["reason"]
    )
    .expect("Failed to create RESULTS_REJECTED metric");
}

/// Record an accepted result
#[cfg(feature = "metrics")]
pub fn record_result_accepted() {
    RESULTS_ACCEPTED.inc();
}

/// Record a rejected result with reason
#[cfg(feature = "metrics")]
pub fn record_result_rejected(reason: &str) {
    RESULTS_REJECTED.with_label_values(&[reason]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_result_accepted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_result_rejected(_reason: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        record_result_accepted();
        record_result_rejected("malformed");
    }
}
