//! Ports (hexagonal boundaries).

pub mod inbound;
pub mod outbound;

pub use inbound::TokenizationApi;
pub use outbound::{
    ChainClient, ChainError, ContentStore, ProjectReader, ReadError, StoreError,
};
