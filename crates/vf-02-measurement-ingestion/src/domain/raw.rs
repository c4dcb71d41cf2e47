//! Raw measurement shape, after key canonicalization.
//!
//! Every numeric field is optional here: presence is a validation concern,
//! not a parsing one, so that a missing value is reported as a violation
//! alongside any other problem in the same payload.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeasurement {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub processing_time_seconds: Option<f64>,
    #[serde(default)]
    pub final_results: Option<RawFinalResults>,
    #[serde(default)]
    pub component_results: Option<RawComponentResults>,
    #[serde(default)]
    pub integration_weights: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFinalResults {
    #[serde(default)]
    pub agb_mg_per_ha: Option<f64>,
    #[serde(default)]
    pub carbon_sequestration_kg: Option<f64>,
    #[serde(default)]
    pub study_area_ha: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponentResults {
    #[serde(default)]
    pub satellite: Option<RawSatellite>,
    #[serde(default)]
    pub drone: Option<RawDrone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSatellite {
    #[serde(default)]
    pub agb_mg_per_ha: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub n_points: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDrone {
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
