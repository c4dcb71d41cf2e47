//! # Token Metadata
//!
//! Deterministic ERC-721 metadata for a verified project.
//!
//! The serialized form is hashed into the metadata CID, so two builds from
//! the same inputs must produce byte-identical JSON:
//!
//! - field order is the declaration order of the structs below
//! - every non-integer number is a fixed-decimal string
//!   (2 places for mass, area, height and duration; 4 for price, tons and
//!   ratios; 6 for coordinates)
//! - the only timestamp is the approval event's `verified_at`
//!
//! ```text
//! {
//!   name, description, image, external_url,
//!   attributes: [ {trait_type, value, display_type?}, ... ],
//!   verification: {...},
//!   mlResults: {...},
//!   projectDetails: {...}
//! }
//! ```

use super::config::{ChainConfig, PublishConfig};
use super::content_id::ContentId;
use super::pricing::{tons, PricingEngine, PRICE_DECIMALS};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Coordinates, Location, MeasurementResult, Project};
use thiserror::Error;

const MASS_DECIMALS: usize = 2;
const RATIO_DECIMALS: usize = 4;
const COORDINATE_DECIMALS: usize = 6;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const NUMBER: &str = "number";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The approval event is the only permitted source of the date.
    #[error("project {project_id} has no verification timestamp")]
    MissingVerificationDate { project_id: String },

    #[error("metadata serialization failed: {reason}")]
    Serialization { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub external_url: String,
    pub attributes: Vec<Attribute>,
    pub verification: VerificationBlock,
    #[serde(rename = "mlResults")]
    pub measurement_results: MeasurementBlock,
    #[serde(rename = "projectDetails")]
    pub project_details: ProjectDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

impl Attribute {
    fn text(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
            display_type: None,
        }
    }

    fn number(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
            display_type: Some(NUMBER.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationBlock {
    pub verified: bool,
    pub verification_date: String,
    pub verified_by: Option<String>,
    pub ml_analysis_job_id: String,
    pub processing_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementBlock {
    pub carbon_sequestration: CarbonBlock,
    pub biomass: BiomassBlock,
    pub study_area: StudyAreaBlock,
    pub satellite: Option<SatelliteBlock>,
    pub drone: Option<DroneBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonBlock {
    pub kg: String,
    pub tons: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomassBlock {
    pub agb_mg_per_ha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyAreaBlock {
    pub hectares: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteBlock {
    pub agb_mg_per_ha: Option<String>,
    pub height_m: Option<String>,
    pub confidence: Option<String>,
    pub n_points: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneBlock {
    pub agb_mg_per_ha: Option<String>,
    pub area_m2: Option<String>,
    pub carbon_kg: Option<String>,
    pub co2_kg: Option<String>,
    pub confidence: Option<String>,
    pub openness: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub area_hectares: Option<String>,
    pub crop_type: String,
    pub start_date: Option<String>,
    pub location: Option<LocationBlock>,
    pub owner: OwnerBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationBlock {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub coordinates: Option<CoordinatesBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatesBlock {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerBlock {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Builds token metadata from a project and its validated measurement.
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    pricing: PricingEngine,
    gateway_url: String,
    external_url_base: String,
    placeholder_image_url: String,
    network_name: String,
    token_standard: String,
}

impl MetadataBuilder {
    pub fn new(pricing: PricingEngine, publish: &PublishConfig, chain: &ChainConfig) -> Self {
        Self {
            pricing,
            gateway_url: publish.gateway_url.clone(),
            external_url_base: publish.external_url_base.clone(),
            placeholder_image_url: publish.placeholder_image_url.clone(),
            network_name: chain.network_name.clone(),
            token_standard: chain.token_standard.clone(),
        }
    }

    pub fn build(
        &self,
        project: &Project,
        ml: &MeasurementResult,
        image_cid: Option<&ContentId>,
    ) -> Result<TokenMetadata, MetadataError> {
        let verified_at = project.verification.verified_at.ok_or_else(|| {
            MetadataError::MissingVerificationDate {
                project_id: project.id.to_string(),
            }
        })?;

        let results = &ml.final_results;
        let carbon_kg = results.carbon_sequestration_kg;
        let carbon_tons = tons(carbon_kg);
        let satellite = ml.component_results.satellite.as_ref();
        let drone = ml.component_results.drone.as_ref();

        let image = match image_cid {
            Some(cid) => format!("{}{}", self.gateway_url, cid),
            None => self.placeholder_image_url.clone(),
        };

        let attributes = vec![
            Attribute::text("Project ID", project.id.as_str()),
            Attribute::text("Project Name", project.title.as_str()),
            Attribute::number("Carbon Sequestration (kg)", fixed(carbon_kg, MASS_DECIMALS)),
            Attribute::number("Carbon Sequestration (tons)", fixed(carbon_tons, RATIO_DECIMALS)),
            Attribute::number("Area (hectares)", fixed(results.study_area_ha, MASS_DECIMALS)),
            Attribute::number("Biomass (Mg/ha)", fixed(results.agb_mg_per_ha, MASS_DECIMALS)),
            Attribute::text("Crop Type", project.crop_type.as_str()),
            Attribute::text("Location", location_label(project.location.as_ref())),
            Attribute::text("Verification Date", verified_at.format("%Y-%m-%d").to_string()),
            Attribute::text("ML Job ID", ml.job_id.as_str()),
            Attribute::number(
                "Satellite Confidence",
                fixed_or_na(satellite.and_then(|s| s.confidence), RATIO_DECIMALS),
            ),
            Attribute::number(
                "Drone Confidence",
                fixed_or_na(drone.and_then(|d| d.confidence), RATIO_DECIMALS),
            ),
            Attribute::text("Network", self.network_name.as_str()),
            Attribute::text("Standard", self.token_standard.as_str()),
            Attribute::number(
                &format!("Price ({})", self.pricing.currency()),
                fixed(self.pricing.price_rounded(carbon_kg), PRICE_DECIMALS as usize),
            ),
            Attribute::text(
                "Owner Name",
                project.owner.name.as_deref().unwrap_or(UNKNOWN),
            ),
            Attribute::text(
                "Owner Email",
                project.owner.email.as_deref().unwrap_or(UNKNOWN),
            ),
        ];

        Ok(TokenMetadata {
            name: format!("Carbon Credit #{}", short_id(project.id.as_str())),
            description: format!(
                "Verified carbon credit from {}. This NFT represents {} tons of CO2 \
                 sequestered through sustainable forestry and plantation practices.",
                project.title,
                fixed(carbon_tons, RATIO_DECIMALS)
            ),
            image,
            external_url: format!("{}{}", self.external_url_base, project.id),
            attributes,
            verification: VerificationBlock {
                verified: true,
                verification_date: timestamp(verified_at),
                verified_by: project.verification.verified_by.as_ref().map(|u| u.to_string()),
                ml_analysis_job_id: ml.job_id.clone(),
                processing_time: ml
                    .processing_time_seconds
                    .map(|s| fixed(s, MASS_DECIMALS)),
            },
            measurement_results: MeasurementBlock {
                carbon_sequestration: CarbonBlock {
                    kg: fixed(carbon_kg, MASS_DECIMALS),
                    tons: fixed(carbon_tons, RATIO_DECIMALS),
                },
                biomass: BiomassBlock {
                    agb_mg_per_ha: fixed(results.agb_mg_per_ha, MASS_DECIMALS),
                },
                study_area: StudyAreaBlock {
                    hectares: fixed(results.study_area_ha, MASS_DECIMALS),
                },
                satellite: satellite.map(|s| SatelliteBlock {
                    agb_mg_per_ha: s.agb_mg_per_ha.map(|v| fixed(v, MASS_DECIMALS)),
                    height_m: s.height_m.map(|v| fixed(v, MASS_DECIMALS)),
                    confidence: s.confidence.map(|v| fixed(v, RATIO_DECIMALS)),
                    n_points: s.n_points,
                }),
                drone: drone.map(|d| DroneBlock {
                    agb_mg_per_ha: d.agb_mg_per_ha.map(|v| fixed(v, MASS_DECIMALS)),
                    area_m2: d.area_m2.map(|v| fixed(v, MASS_DECIMALS)),
                    carbon_kg: d.carbon_kg.map(|v| fixed(v, MASS_DECIMALS)),
                    co2_kg: d.co2_kg.map(|v| fixed(v, MASS_DECIMALS)),
                    confidence: d.confidence.map(|v| fixed(v, RATIO_DECIMALS)),
                    openness: d.openness.map(|v| fixed(v, RATIO_DECIMALS)),
                }),
            },
            project_details: ProjectDetails {
                id: project.id.to_string(),
                title: project.title.clone(),
                description: project.description.clone(),
                area_hectares: project.area_hectares.map(|a| fixed(a, MASS_DECIMALS)),
                crop_type: project.crop_type.clone(),
                start_date: project.start_date.map(timestamp),
                location: project.location.as_ref().map(location_block),
                owner: OwnerBlock {
                    id: project.owner.id.to_string(),
                    name: project.owner.name.clone(),
                    email: project.owner.email.clone(),
                },
            },
        })
    }

    /// Compact JSON in declaration order: the exact bytes that get hashed.
    pub fn to_canonical_bytes(metadata: &TokenMetadata) -> Result<Vec<u8>, MetadataError> {
        serde_json::to_vec(metadata).map_err(|e| MetadataError::Serialization {
            reason: e.to_string(),
        })
    }
}

/// Fixed-decimal text. Negative zero prints as zero.
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value + 0.0)
}

fn fixed_or_na(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| fixed(v, decimals))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Last six characters of the id, uppercased.
fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(6);
    chars[start..].iter().collect::<String>().to_uppercase()
}

fn location_label(location: Option<&Location>) -> String {
    let city = location.and_then(|l| l.city.as_deref()).unwrap_or(UNKNOWN);
    let state = location.and_then(|l| l.state.as_deref()).unwrap_or(UNKNOWN);
    format!("{city}, {state}")
}

fn location_block(location: &Location) -> LocationBlock {
    LocationBlock {
        address: location.address.clone(),
        city: location.city.clone(),
        state: location.state.clone(),
        country: location.country.clone(),
        postal_code: location.postal_code.clone(),
        coordinates: location.coordinates.map(|Coordinates { lat, lng }| CoordinatesBlock {
            lat: fixed(lat, COORDINATE_DECIMALS),
            lng: fixed(lng, COORDINATE_DECIMALS),
        }),
    }
}
