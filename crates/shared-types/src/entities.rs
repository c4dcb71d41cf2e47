//! # Core Domain Entities
//!
//! Defines the project record and everything attached to it over its
//! verification lifecycle.
//!
//! ## Clusters
//!
//! - **Identity**: `ProjectId`, `UserId`, `Actor`, `Role`
//! - **Project**: `Project`, `ProjectStatus`, `Location`, `ProjectImage`
//! - **Verification**: `VerificationRecord`
//! - **Measurement**: `MeasurementResult` and its component estimates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Opaque identifier of a project record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account role. A closed set: authorization never compares role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Land owner registering parcels.
    Farmer,
    /// Buyer browsing verified credits.
    #[serde(rename = "marketplaceuser")]
    MarketplaceUser,
    /// Verification administrator.
    Admin,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: UserId::new(user_id),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Reference to the owning user, with the display fields token metadata needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl OwnerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: None,
            email: None,
        }
    }
}

// =============================================================================
// CLUSTER B: PROJECT
// =============================================================================

/// Lifecycle status of a project.
///
/// ```text
/// draft ──→ submitted ──→ underReview ──┬──→ verified
///                                       └──→ rejected
/// ```
///
/// `Approved` exists in stored records but no transition produces or
/// consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Verified,
    Rejected,
    Approved,
}

impl ProjectStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Submitted => "submitted",
            ProjectStatus::UnderReview => "underReview",
            ProjectStatus::Verified => "verified",
            ProjectStatus::Rejected => "rejected",
            ProjectStatus::Approved => "approved",
        }
    }

    /// Terminal states accept no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Verified | ProjectStatus::Rejected)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "submitted" => Ok(ProjectStatus::Submitted),
            "underReview" => Ok(ProjectStatus::UnderReview),
            "verified" => Ok(ProjectStatus::Verified),
            "rejected" => Ok(ProjectStatus::Rejected),
            "approved" => Ok(ProjectStatus::Approved),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Postal location of the parcel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Where a field photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTag {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geotagged field photo attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub geotag: Option<GeoTag>,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ProjectImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            thumbnail_url: None,
            geotag: None,
            captured_at: None,
            mime_type: None,
            size_bytes: None,
            description: None,
            filename: None,
            width: None,
            height: None,
            uploaded_at: None,
        }
    }
}

/// A land parcel's carbon-sequestration claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub owner: OwnerRef,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    pub crop_type: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_credits: f64,
    #[serde(default)]
    pub issued_credits: f64,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    #[serde(default)]
    pub verification: VerificationRecord,
    #[serde(default)]
    pub field_verification: VerificationRecord,
    #[serde(default)]
    pub ml_analysis_results: Option<MeasurementResult>,
    /// Free-form attributes supplied by the owner.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Write counter. Every stored replacement increments it by one.
    #[serde(default)]
    pub revision: u64,
}

impl Project {
    /// The attached measurement, only if it carries final results.
    pub fn final_results(&self) -> Option<&FinalResults> {
        self.ml_analysis_results.as_ref().map(|r| &r.final_results)
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner.id == user_id
    }
}

// =============================================================================
// CLUSTER C: VERIFICATION
// =============================================================================

/// Outcome of a review. Shared shape for the administrative and the field
/// verification channels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub verified_by: Option<UserId>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// CLUSTER D: MEASUREMENT
// =============================================================================

/// Canonical measurement result. Produced only by the ingestion validator;
/// every biomass quantity is named `agb_mg_per_ha` here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    pub job_id: String,
    #[serde(default)]
    pub processing_time_seconds: Option<f64>,
    pub final_results: FinalResults,
    #[serde(default)]
    pub component_results: ComponentResults,
    #[serde(default)]
    pub integration_weights: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Integrated estimate over the study area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResults {
    /// Above-ground biomass, megagrams per hectare.
    pub agb_mg_per_ha: f64,
    pub carbon_sequestration_kg: f64,
    pub study_area_ha: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentResults {
    #[serde(default)]
    pub satellite: Option<SatelliteEstimate>,
    #[serde(default)]
    pub drone: Option<DroneEstimate>,
}

/// Satellite-derived sub-estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteEstimate {
    #[serde(default)]
    pub agb_mg_per_ha: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub n_points: Option<u64>,
}

/// Drone-derived sub-estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneEstimate {
    #[serde(default)]
    pub agb_mg_per_ha: Option<f64>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub openness: Option<f64>,
    #[serde(default)]
    pub carbon_kg: Option<f64>,
    #[serde(default)]
    pub co2_kg: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ProjectStatus::UnderReview).unwrap();
        assert_eq!(json, "\"underReview\"");
        let parsed: ProjectStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Approved);
    }

    #[test]
    fn test_status_from_str_matches_as_str() {
        for status in [
            ProjectStatus::Draft,
            ProjectStatus::Submitted,
            ProjectStatus::UnderReview,
            ProjectStatus::Verified,
            ProjectStatus::Rejected,
            ProjectStatus::Approved,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("pending".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProjectStatus::Verified.is_terminal());
        assert!(ProjectStatus::Rejected.is_terminal());
        assert!(!ProjectStatus::UnderReview.is_terminal());
    }

    #[test]
    fn test_role_wire_names() {
        let role: Role = serde_json::from_str("\"marketplaceuser\"").unwrap();
        assert_eq!(role, Role::MarketplaceUser);
        assert!(Actor::new("u1", Role::Admin).is_admin());
    }

    #[test]
    fn test_image_upload_fields_wire_names() {
        let image: ProjectImage = serde_json::from_value(serde_json::json!({
            "url": "https://cdn.example/plot.jpg",
            "filename": "plot.jpg",
            "width": 4000,
            "height": 3000,
            "uploadedAt": "2024-06-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(image.filename.as_deref(), Some("plot.jpg"));
        assert_eq!((image.width, image.height), (Some(4000), Some(3000)));
        assert!(image.uploaded_at.is_some());
        assert_eq!(image.geotag, None);
    }
}
