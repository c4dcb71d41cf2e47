//! # Lifecycle Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! vf-01-project-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! - `lifecycle_transitions_total` - Counter of applied transitions (by target status)
//! - `lifecycle_conflicts_total` - Counter of writes lost to a concurrent writer
//! - `lifecycle_denials_total` - Counter of requests refused by the verification gate

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref TRANSITIONS: IntCounterVec = register_int_counter_vec!(
        "lifecycle_transitions_total",
        "Total number of lifecycle transitions applied",
        &["target"]
    )
    .expect("Failed to create TRANSITIONS metric");

    pub static ref CONFLICTS: IntCounter = register_int_counter!(
        "lifecycle_conflicts_total",
        "Total number of conditional writes lost to a concurrent writer"
    )
    .expect("Failed to create CONFLICTS metric");

    pub static ref DENIALS: IntCounter = register_int_counter!(
        "lifecycle_denials_total",
        "Total number of requests refused by the verification gate"
    )
    .expect("Failed to create DENIALS metric");
}

#[cfg(feature = "metrics")]
pub fn record_transition(target: &str) {
    TRANSITIONS.with_label_values(&[target]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_conflict() {
    CONFLICTS.inc();
}

#[cfg(feature = "metrics")]
pub fn record_denial() {
    DENIALS.inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_transition(_target: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_conflict() {}

#[cfg(not(feature = "metrics"))]
pub fn record_denial() {}
