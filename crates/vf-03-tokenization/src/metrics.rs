//! # Tokenization Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! vf-03-tokenization = { path = "...", features = ["metrics"] }
//! ```
//!
//! - `tokenization_publishes_total` - Counter of content pinned (by outcome)
//! - `tokenization_publish_reuses_total` - Counter of publishes answered from already-confirmed CIDs
//! - `tokenization_mints_prepared_total` - Counter of mint payloads assembled
//! - `tokenization_chain_failures_total` - Counter of payloads the chain client did not accept

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref PUBLISHES: IntCounterVec = register_int_counter_vec!(
        "tokenization_publishes_total",
        "Total number of content pins attempted",
        &["outcome"]
    )
    .expect("Failed to create PUBLISHES metric");

    pub static ref PUBLISH_REUSES: IntCounter = register_int_counter!(
        "tokenization_publish_reuses_total",
        "Total number of publishes answered from an already-confirmed CID"
    )
    .expect("Failed to create PUBLISH_REUSES metric");

    pub static ref MINTS_PREPARED: IntCounter = register_int_counter!(
        "tokenization_mints_prepared_total",
        "Total number of mint payloads assembled"
    )
    .expect("Failed to create MINTS_PREPARED metric");

    pub static ref CHAIN_FAILURES: IntCounter = register_int_counter!(
        "tokenization_chain_failures_total",
        "Total number of payloads the chain client did not accept"
    )
    .expect("Failed to create CHAIN_FAILURES metric");
}

#[cfg(feature = "metrics")]
pub fn record_publish(outcome: &str) {
    PUBLISHES.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_publish_reuse() {
    PUBLISH_REUSES.inc();
}

#[cfg(feature = "metrics")]
pub fn record_mint_prepared() {
    MINTS_PREPARED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_chain_failure() {
    CHAIN_FAILURES.inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_publish(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_publish_reuse() {}

#[cfg(not(feature = "metrics"))]
pub fn record_mint_prepared() {}

#[cfg(not(feature = "metrics"))]
pub fn record_chain_failure() {}
