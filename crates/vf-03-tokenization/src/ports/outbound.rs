//! # Outbound Ports
//!
//! External collaborators of the mint pipeline: the content-addressed
//! store, the chain client and the project record source.

use crate::domain::{ContentId, MintPayload, MintReceipt};
use async_trait::async_trait;
use shared_types::{Project, ProjectId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("content store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("content store I/O failure: {reason}")]
    Io { reason: String },
}

/// Content-addressed storage.
///
/// The store computes its own identifier for what it keeps. Pinning bytes it
/// already holds succeeds and returns the same identifier without keeping a
/// second copy.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, StoreError>;

    /// `Ok(None)` when nothing is stored under `id`.
    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Whether the store still holds `id`.
    async fn contains(&self, id: &ContentId) -> Result<bool, StoreError> {
        Ok(self.get(id).await?.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain client rejected the payload: {reason}")]
    Rejected { reason: String },

    #[error("chain client unreachable: {reason}")]
    Unreachable { reason: String },
}

/// Wallet or chain client that signs and broadcasts the mint.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn submit(&self, payload: &MintPayload) -> Result<MintReceipt, ChainError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("project not found: {id}")]
    NotFound { id: ProjectId },

    #[error("project source failure: {reason}")]
    Backend { reason: String },
}

/// Read-only access to project records.
#[async_trait]
pub trait ProjectReader: Send + Sync {
    async fn project(&self, id: &ProjectId) -> Result<Project, ReadError>;
}
