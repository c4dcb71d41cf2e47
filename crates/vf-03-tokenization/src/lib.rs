//! # vf-03-tokenization
//!
//! Turns a verified carbon-sequestration project into everything needed to
//! mint a tradable credit, without touching a chain or a wallet.
//!
//! ## Pipeline
//!
//! ```text
//! project (verified) ──→ [image] ──publish──→ imageCID
//!                           │
//!                           ↓
//!                     TokenMetadata ──canonical JSON──publish──→ metadataCID
//!                                                                   │
//!                                                                   ↓
//!                                              MintPayload ──forward──→ ChainClient
//! ```
//!
//! | Step | Failure | Kind |
//! |------|---------|------|
//! | owner address | malformed | `Validation` |
//! | project | not verified, no measurement | `Forbidden` |
//! | publish | store error, timeout, CID mismatch | `UploadFailed` (retryable) |
//! | forward | rejected, unreachable, timeout | `ChainUnavailable` |
//!
//! ## Determinism
//!
//! Metadata bytes are a pure function of the project, its measurement and the
//! configuration: keys in fixed order, numbers at fixed precision, timestamps
//! taken from the record. Identical inputs therefore give identical CIDs, and
//! retrying a failed publish can never produce a second, different token URI.
//!
//! ## Module Structure
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  adapters/ - InMemoryContentStore, FsContentStore             │
//! └───────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - TokenizationApi                          │
//! │  ports/outbound.rs - ContentStore, ChainClient, ProjectReader │
//! └───────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌───────────────────────────────────────────────────────────────┐
//! │  service/  - MintPipeline, ContentAddressedPublisher          │
//! │  domain/   - pricing, fixed point, metadata, CIDs, payload    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{FsContentStore, InMemoryContentStore};
pub use domain::{
    fixed_point_to_kg, is_address, kg_to_fixed_point, kg_to_units, round_to, tons, Attribute,
    AssemblyError, ChainConfig, ConfigError, ContentId, FixedPointError, MetadataBuilder,
    MetadataError, MintPayload, MintPayloadAssembler, MintReceipt, PricingConfig, PricingEngine,
    PublishConfig, SellerPortfolio, SellerSummary, TokenMetadata, TokenizationConfig,
    CARBON_DECIMALS, PRICE_DECIMALS,
};
pub use error::{MintError, MintResult, PublishError, PublishResult};
pub use ports::{
    ChainClient, ChainError, ContentStore, ProjectReader, ReadError, StoreError, TokenizationApi,
};
pub use service::{ContentAddressedPublisher, MintPipeline};
