//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Defaults match the production deployment (Polygon Amoy, ERC-721, Pinata
//! gateway). Every value is read once at startup and handed to the
//! subsystems at construction time.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use vf_03_tokenization::{ChainConfig, PricingConfig, PublishConfig, TokenizationConfig};
use vf_telemetry::TelemetryConfig;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Credit pricing.
    pub pricing: PricingConfig,
    /// Target chain and contract.
    pub chain: ChainConfig,
    /// Content store and publishing.
    pub storage: StorageConfig,
    /// Logging.
    pub telemetry: TelemetryConfig,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory of the filesystem content store.
    pub data_dir: PathBuf,
    /// Gateway, URLs and upload deadline for published content.
    pub publish: PublishConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/content"),
            publish: PublishConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an unusable value '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error(transparent)]
    Tokenization(#[from] vf_03_tokenization::ConfigError),
}

impl NodeConfig {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// # Environment Variables
    ///
    /// - `VF_PRICE_PER_TON`: Price of one tonne of sequestered carbon (default: 0.02)
    /// - `VF_REFERENCE_USD_PER_TON`: Display-only fiat value of one tonne (default: 50)
    /// - `VF_CONTRACT_ADDRESS`: Credit contract address
    /// - `VF_GATEWAY_URL`: Public gateway prefix for CIDs
    /// - `VF_DATA_DIR`: Filesystem content store directory (default: ./data/content)
    /// - `VF_PUBLISH_TIMEOUT_SECS`: Upload deadline (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(value) = lookup("VF_PRICE_PER_TON") {
            config.pricing.price_per_ton =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "VF_PRICE_PER_TON",
                    value,
                })?;
        }
        if let Some(value) = lookup("VF_REFERENCE_USD_PER_TON") {
            config.pricing.reference_usd_per_ton =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "VF_REFERENCE_USD_PER_TON",
                    value,
                })?;
        }
        if let Some(value) = lookup("VF_CONTRACT_ADDRESS") {
            config.chain.contract_address = value.trim().to_string();
        }
        if let Some(value) = lookup("VF_GATEWAY_URL") {
            config.storage.publish.gateway_url = value.trim().to_string();
        }
        if let Some(value) = lookup("VF_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("VF_PUBLISH_TIMEOUT_SECS") {
            config.storage.publish.timeout_secs =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "VF_PUBLISH_TIMEOUT_SECS",
                    value,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject a non-finite or negative price, a malformed contract address
    /// and zero timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tokenization().validate()?;
        Ok(())
    }

    /// The slice of configuration the tokenization subsystem consumes.
    pub fn tokenization(&self) -> TokenizationConfig {
        TokenizationConfig {
            pricing: self.pricing.clone(),
            chain: self.chain.clone(),
            publish: self.storage.publish.clone(),
        }
    }

    pub fn publish_timeout(&self) -> Duration {
        self.storage.publish.timeout()
    }
}
