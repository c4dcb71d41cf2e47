//! # Veriflow Telemetry
//!
//! Structured logging for every Veriflow crate. Subsystems only emit
//! `tracing` events; the binary calls [`init_logging`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vf_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VF_SERVICE_NAME` | `veriflow` | Service name in logs |
//! | `VF_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `VF_JSON_LOGS` | `false` (`true` in containers) | JSON output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}
