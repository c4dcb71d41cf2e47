//! Domain layer: pure, synchronous and deterministic.

pub mod assembler;
pub mod config;
pub mod content_id;
pub mod fixed_point;
pub mod metadata;
pub mod portfolio;
pub mod pricing;

pub use assembler::{AssemblyError, MintPayload, MintPayloadAssembler, MintReceipt};
pub use config::{
    is_address, ChainConfig, ConfigError, PricingConfig, PublishConfig, TokenizationConfig,
    DEFAULT_CONTRACT_ADDRESS, DEFAULT_PRICE_PER_TON, DEFAULT_REFERENCE_USD_PER_TON,
};
pub use content_id::ContentId;
pub use fixed_point::{fixed_point_to_kg, kg_to_fixed_point, kg_to_units, FixedPointError, CARBON_DECIMALS};
pub use metadata::{Attribute, MetadataBuilder, MetadataError, TokenMetadata};
pub use portfolio::{SellerPortfolio, SellerSummary};
pub use pricing::{round_to, tons, PricingEngine, PRICE_DECIMALS};
