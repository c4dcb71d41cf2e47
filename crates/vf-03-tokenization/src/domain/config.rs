//! Tokenization configuration with validation.
//!
//! Passed into the pricing engine, metadata builder, publisher and payload
//! assembler at construction time. Nothing in this crate reads process-wide
//! state.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default credit price per metric ton of sequestered carbon.
pub const DEFAULT_PRICE_PER_TON: f64 = 0.02;

/// Fiat reference value of one metric ton, shown next to the token price.
pub const DEFAULT_REFERENCE_USD_PER_TON: f64 = 50.0;

/// Carbon credit contract on Polygon Amoy.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x85FF485d027b23D7CB41DA30FDBcdE3Df31EB33E";

/// Bundle of everything the mint pipeline needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizationConfig {
    pub pricing: PricingConfig,
    pub chain: ChainConfig,
    pub publish: PublishConfig,
}

impl TokenizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pricing.validate()?;
        self.chain.validate()?;
        self.publish.validate()
    }
}

/// Fixed, non-oracle pricing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Price of one metric ton in `currency`.
    pub price_per_ton: f64,
    pub currency: String,
    /// Display-only fiat value of one metric ton. Never enters a payload.
    pub reference_usd_per_ton: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_ton: DEFAULT_PRICE_PER_TON,
            currency: "MATIC".to_string(),
            reference_usd_per_ton: DEFAULT_REFERENCE_USD_PER_TON,
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for price in [self.price_per_ton, self.reference_usd_per_ton] {
            if !price.is_finite() || price < 0.0 {
                return Err(ConfigError::InvalidPrice(price));
            }
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::MissingValue("pricing.currency"));
        }
        Ok(())
    }
}

/// Target chain and token contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub network_name: String,
    pub token_standard: String,
    pub contract_address: String,
    /// Deadline for handing a payload to the chain client.
    pub submit_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network_name: "Polygon Amoy".to_string(),
            token_standard: "ERC-721".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            submit_timeout_secs: 60,
        }
    }
}

impl ChainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_address(&self.contract_address) {
            return Err(ConfigError::InvalidContractAddress(
                self.contract_address.clone(),
            ));
        }
        if self.submit_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("chain.submit_timeout_secs"));
        }
        Ok(())
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

/// Content-addressed publishing and the URLs derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Prefix that turns a CID into a fetchable URI.
    pub gateway_url: String,
    /// Prefix of the human-facing project page.
    pub external_url_base: String,
    /// Image shown when no field photo accompanies the mint.
    pub placeholder_image_url: String,
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://gateway.pinata.cloud/ipfs/".to_string(),
            external_url_base: "https://veriflow.app/projects/".to_string(),
            placeholder_image_url:
                "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800".to_string(),
            timeout_secs: 30,
        }
    }
}

impl PublishConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("publish.gateway_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("publish.timeout_secs"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("price per ton must be a finite non-negative number, got {0}")]
    InvalidPrice(f64),

    #[error("contract address must be 0x followed by 40 hex digits, got '{0}'")]
    InvalidContractAddress(String),

    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("{0} is required")]
    MissingValue(&'static str),
}

/// Ethereum-style account or contract address: `0x` + 40 hex digits.
pub fn is_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(body) => body.len() == 40 && hex::decode(body).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TokenizationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.price_per_ton, 0.02);
        assert_eq!(config.pricing.currency, "MATIC");
        assert_eq!(config.pricing.reference_usd_per_ton, 50.0);
        assert_eq!(config.chain.network_name, "Polygon Amoy");
        assert_eq!(config.publish.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_bad_price() {
        let mut config = TokenizationConfig::default();
        config.pricing.price_per_ton = -0.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPrice(-0.5)));
        config.pricing.price_per_ton = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TokenizationConfig::default();
        config.pricing.reference_usd_per_ton = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_contract_address() {
        let mut config = TokenizationConfig::default();
        config.chain.contract_address = "0x1234".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidContractAddress(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = TokenizationConfig::default();
        config.publish.timeout_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTimeout("publish.timeout_secs"))
        );
    }

    #[test]
    fn test_address_shape() {
        assert!(is_address("0x85FF485d027b23D7CB41DA30FDBcdE3Df31EB33E"));
        assert!(!is_address("85FF485d027b23D7CB41DA30FDBcdE3Df31EB33E"));
        assert!(!is_address("0xZZFF485d027b23D7CB41DA30FDBcdE3Df31EB33E"));
        assert!(!is_address("0x85FF485d027b23D7CB41DA30FDBcdE3Df31EB33"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TokenizationConfig =
            serde_json::from_str(r#"{"pricing":{"price_per_ton":0.05}}"#).unwrap();
        assert_eq!(config.pricing.price_per_ton, 0.05);
        assert_eq!(config.pricing.currency, "MATIC");
        assert_eq!(config.chain, ChainConfig::default());
    }
}
