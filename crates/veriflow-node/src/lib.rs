//! # Veriflow Node Library
//!
//! Wiring of the Veriflow subsystems behind one façade, exposed for the
//! `veriflow-node` binary and for the scenario tests.
//!
//! ## Subsystems
//!
//! 1. Project Lifecycle (vf-01) - state machine, verification gate, CAS writes
//! 2. Measurement Ingestion (vf-02) - raw ML result validation (used by vf-01)
//! 3. Tokenization (vf-03) - pricing, metadata, publishing, mint payloads
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Validate price, contract address and timeouts
//! 3. Initialize logging
//! 4. Build the lifecycle service, then the mint pipeline on top of it

pub mod adapters;
pub mod container;

pub use adapters::LifecycleProjectReader;
pub use container::{
    node::{ApprovedMint, NodeResult},
    ConfigError, NodeConfig, NodeError, StorageConfig, VeriflowNode,
};
