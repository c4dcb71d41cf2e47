//! Mint payload assembly.
//!
//! The payload is everything an external chain client needs to issue the
//! credit; it never has to look the project up again.

use super::config::{is_address, ChainConfig, PublishConfig};
use super::content_id::ContentId;
use super::fixed_point::{kg_to_fixed_point, FixedPointError};
use super::metadata::TokenMetadata;
use super::pricing::{tons, PricingEngine};
use serde::{Deserialize, Serialize};
use shared_types::{MeasurementResult, Project, ProjectId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("owner address must be 0x followed by 40 hex digits, got '{0}'")]
    InvalidOwnerAddress(String),

    #[error(transparent)]
    CarbonAmount(#[from] FixedPointError),
}

/// Chain-ready mint request. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintPayload {
    pub project_id: ProjectId,
    pub metadata_uri: String,
    #[serde(rename = "metadataCID")]
    pub metadata_cid: ContentId,
    #[serde(rename = "imageCID")]
    pub image_cid: Option<ContentId>,
    /// `kg * 10^18` as a decimal integer string.
    pub carbon_amount_fixed_point: String,
    pub carbon_kg: f64,
    pub carbon_tons: f64,
    /// Rounded to 4 decimal places.
    pub price_in_currency: f64,
    pub currency: String,
    pub contract_address: String,
    pub owner_address: String,
    /// The document published under `metadata_cid`.
    pub metadata: TokenMetadata,
}

/// What the chain client reports after accepting a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub tx_hash: String,
    pub token_id: String,
}

#[derive(Debug, Clone)]
pub struct MintPayloadAssembler {
    pricing: PricingEngine,
    contract_address: String,
    gateway_url: String,
}

impl MintPayloadAssembler {
    pub fn new(pricing: PricingEngine, chain: &ChainConfig, publish: &PublishConfig) -> Self {
        Self {
            pricing,
            contract_address: chain.contract_address.clone(),
            gateway_url: publish.gateway_url.clone(),
        }
    }

    /// Checked before anything is published.
    pub fn check_owner_address(owner_address: &str) -> Result<(), AssemblyError> {
        if is_address(owner_address) {
            Ok(())
        } else {
            Err(AssemblyError::InvalidOwnerAddress(owner_address.to_string()))
        }
    }

    pub fn metadata_uri(&self, metadata_cid: &ContentId) -> String {
        format!("{}{}", self.gateway_url, metadata_cid)
    }

    pub fn assemble(
        &self,
        project: &Project,
        ml: &MeasurementResult,
        metadata: TokenMetadata,
        metadata_cid: &ContentId,
        owner_address: &str,
    ) -> Result<MintPayload, AssemblyError> {
        Self::check_owner_address(owner_address)?;
        let carbon_kg = ml.final_results.carbon_sequestration_kg;

        Ok(MintPayload {
            project_id: project.id.clone(),
            metadata_uri: self.metadata_uri(metadata_cid),
            metadata_cid: *metadata_cid,
            image_cid: None,
            carbon_amount_fixed_point: kg_to_fixed_point(carbon_kg)?,
            carbon_kg,
            carbon_tons: tons(carbon_kg),
            price_in_currency: self.pricing.price_rounded(carbon_kg),
            currency: self.pricing.currency().to_string(),
            contract_address: self.contract_address.clone(),
            owner_address: owner_address.to_string(),
            metadata,
        })
    }
}

impl MintPayload {
    pub fn with_image(mut self, image_cid: Option<ContentId>) -> Self {
        self.image_cid = image_cid;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::TokenizationConfig;
    use crate::domain::MetadataBuilder;
    use chrono::Utc;
    use shared_types::{FinalResults, OwnerRef, ProjectStatus, VerificationRecord};

    const OWNER: &str = "0x1111111111111111111111111111111111111111";

    fn assembler() -> MintPayloadAssembler {
        let config = TokenizationConfig::default();
        MintPayloadAssembler::new(
            PricingEngine::new(&config.pricing).unwrap(),
            &config.chain,
            &config.publish,
        )
    }

    fn fixture(kg: f64) -> (Project, MeasurementResult) {
        let ml = MeasurementResult {
            job_id: "job".to_string(),
            processing_time_seconds: None,
            final_results: FinalResults {
                agb_mg_per_ha: 85.2,
                carbon_sequestration_kg: kg,
                study_area_ha: 2.5,
            },
            component_results: Default::default(),
            integration_weights: None,
            metadata: None,
        };
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new("p-1"),
            owner: OwnerRef::new("farmer-1"),
            title: "Plot".to_string(),
            description: None,
            location: None,
            area_hectares: None,
            crop_type: "other".to_string(),
            start_date: None,
            end_date: None,
            estimated_credits: 0.0,
            issued_credits: 0.0,
            status: ProjectStatus::Verified,
            notes: String::new(),
            images: vec![],
            verification: VerificationRecord {
                verified: true,
                verified_at: Some(now),
                ..Default::default()
            },
            field_verification: VerificationRecord::default(),
            ml_analysis_results: Some(ml.clone()),
            metadata: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        };
        (project, ml)
    }

    fn metadata(project: &Project, ml: &MeasurementResult) -> TokenMetadata {
        let config = TokenizationConfig::default();
        MetadataBuilder::new(
            PricingEngine::new(&config.pricing).unwrap(),
            &config.publish,
            &config.chain,
        )
        .build(project, ml, None)
        .unwrap()
    }

    #[test]
    fn test_scenario_price_and_amount() {
        let (project, ml) = fixture(1250.5);
        let cid = ContentId::for_bytes(b"metadata");
        let payload = assembler().assemble(&project, &ml, metadata(&project, &ml), &cid, OWNER).unwrap();

        assert_eq!(payload.price_in_currency, 0.025);
        assert_eq!(payload.carbon_amount_fixed_point, "1250500000000000000000");
        assert!((payload.carbon_tons - 1.2505).abs() < 1e-12);
        assert_eq!(payload.metadata, metadata(&project, &ml));
        assert_eq!(
            payload.metadata_uri,
            format!("https://gateway.pinata.cloud/ipfs/{cid}")
        );
        assert_eq!(
            payload.contract_address,
            "0x85FF485d027b23D7CB41DA30FDBcdE3Df31EB33E"
        );
        assert_eq!(payload.project_id, project.id);
    }

    #[test]
    fn test_rejects_malformed_owner_address() {
        let (project, ml) = fixture(1.0);
        let cid = ContentId::for_bytes(b"metadata");
        assert!(matches!(
            assembler().assemble(&project, &ml, metadata(&project, &ml), &cid, "not-an-address"),
            Err(AssemblyError::InvalidOwnerAddress(_))
        ));
    }

    #[test]
    fn test_payload_wire_names() {
        let (project, ml) = fixture(1.0);
        let cid = ContentId::for_bytes(b"metadata");
        let payload = assembler().assemble(&project, &ml, metadata(&project, &ml), &cid, OWNER).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("metadataCID").is_some());
        assert!(json.get("carbonAmountFixedPoint").is_some());
        assert!(json.get("ownerAddress").is_some());
        assert!(json.get("carbonTons").is_some());
        assert_eq!(json["metadata"]["name"], "Carbon Credit #P-1");
    }
}
