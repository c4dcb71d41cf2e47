//! # Inbound Ports

use crate::domain::{MintPayload, MintReceipt};
use crate::error::MintResult;
use crate::ports::outbound::ChainClient;
use async_trait::async_trait;
use shared_types::ProjectId;

/// Tokenization API.
#[async_trait]
pub trait TokenizationApi: Send + Sync {
    /// Publish the image (if any) and the metadata of a verified project and
    /// assemble the payload. Never mutates the project; safe to re-run.
    async fn prepare_mint(
        &self,
        id: &ProjectId,
        owner_address: &str,
        image: Option<&[u8]>,
    ) -> MintResult<MintPayload>;

    /// Hand a payload to the chain client exactly once. Not retried here.
    async fn forward(
        &self,
        chain: &dyn ChainClient,
        payload: &MintPayload,
    ) -> MintResult<MintReceipt>;
}
