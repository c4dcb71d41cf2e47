//! # Mint Pipeline
//!
//! Turns a verified project into a chain-ready payload:
//!
//! 1. check the owner address (nothing is published for a bad address)
//! 2. read the project and require `verified` status with measurement results
//! 3. publish the image, if one was supplied
//! 4. build the metadata (referencing the image CID) and publish it
//! 5. assemble the payload
//!
//! The project record is only read. A failed run can be repeated with the
//! same inputs and produces the same identifiers.

use super::publisher::ContentAddressedPublisher;
use crate::domain::{
    ConfigError, ContentId, MetadataBuilder, MintPayload, MintPayloadAssembler, MintReceipt,
    PricingEngine, TokenizationConfig,
};
use crate::error::{MintError, MintResult};
use crate::metrics;
use crate::ports::inbound::TokenizationApi;
use crate::ports::outbound::{ChainClient, ContentStore, ProjectReader};
use async_trait::async_trait;
use shared_types::{ProjectId, ProjectStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct MintPipeline<P: ProjectReader, S: ContentStore> {
    projects: Arc<P>,
    publisher: ContentAddressedPublisher<S>,
    pricing: PricingEngine,
    metadata: MetadataBuilder,
    assembler: MintPayloadAssembler,
    submit_timeout: Duration,
}

impl<P: ProjectReader, S: ContentStore> MintPipeline<P, S> {
    pub fn new(
        projects: Arc<P>,
        store: Arc<S>,
        config: &TokenizationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pricing = PricingEngine::new(&config.pricing)?;
        Ok(Self {
            projects,
            publisher: ContentAddressedPublisher::new(store, config.publish.timeout()),
            metadata: MetadataBuilder::new(pricing.clone(), &config.publish, &config.chain),
            assembler: MintPayloadAssembler::new(pricing.clone(), &config.chain, &config.publish),
            pricing,
            submit_timeout: config.chain.submit_timeout(),
        })
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub fn publisher(&self) -> &ContentAddressedPublisher<S> {
        &self.publisher
    }

    /// Read published content back, verified against its identifier.
    pub async fn fetch(&self, id: &ContentId) -> MintResult<Vec<u8>> {
        Ok(self.publisher.fetch(id).await?)
    }
}

#[async_trait]
impl<P: ProjectReader, S: ContentStore> TokenizationApi for MintPipeline<P, S> {
    async fn prepare_mint(
        &self,
        id: &ProjectId,
        owner_address: &str,
        image: Option<&[u8]>,
    ) -> MintResult<MintPayload> {
        MintPayloadAssembler::check_owner_address(owner_address)?;

        let project = self.projects.project(id).await?;
        if project.status != ProjectStatus::Verified {
            return Err(MintError::NotVerified {
                project_id: project.id,
                status: project.status,
            });
        }
        let ml = project
            .ml_analysis_results
            .as_ref()
            .ok_or_else(|| MintError::MissingMeasurement {
                project_id: project.id.clone(),
            })?;

        let image_cid = match image {
            Some(bytes) => Some(self.publisher.publish(bytes).await?),
            None => None,
        };

        let metadata = self.metadata.build(&project, ml, image_cid.as_ref())?;
        let bytes = MetadataBuilder::to_canonical_bytes(&metadata)?;
        let metadata_cid = self.publisher.publish(&bytes).await?;

        let payload = self
            .assembler
            .assemble(&project, ml, metadata, &metadata_cid, owner_address)?
            .with_image(image_cid);

        metrics::record_mint_prepared();
        info!(
            project_id = %project.id,
            metadata_cid = %payload.metadata_cid,
            carbon_kg = payload.carbon_kg,
            price = payload.price_in_currency,
            "Mint payload prepared"
        );
        Ok(payload)
    }

    async fn forward(
        &self,
        chain: &dyn ChainClient,
        payload: &MintPayload,
    ) -> MintResult<MintReceipt> {
        let outcome = tokio::time::timeout(self.submit_timeout, chain.submit(payload)).await;
        let reason = match outcome {
            Ok(Ok(receipt)) => {
                info!(
                    project_id = %payload.project_id,
                    tx_hash = %receipt.tx_hash,
                    token_id = %receipt.token_id,
                    "Mint submitted"
                );
                return Ok(receipt);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "no answer within {}s",
                self.submit_timeout.as_secs()
            ),
        };

        metrics::record_chain_failure();
        warn!(project_id = %payload.project_id, reason = %reason, "Mint not submitted");
        Err(MintError::ChainUnavailable { reason })
    }
}
