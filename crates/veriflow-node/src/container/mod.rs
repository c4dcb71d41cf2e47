//! # Node Container
//!
//! Configuration and the façade that owns every subsystem instance.

pub mod config;
pub mod node;

pub use config::{ConfigError, NodeConfig, StorageConfig};
pub use node::{NodeError, VeriflowNode};
