//! Measurement result validator
//!
//! Turns an untrusted JSON result from the external measurement service into
//! the canonical `MeasurementResult`, or refuses it with every violation
//! found. Validation never touches a project: the caller attaches the output
//! only on success, so a refused payload cannot partially overwrite a
//! previously attached result.

use super::canonical::canonicalize;
use super::raw::{RawComponentResults, RawDrone, RawFinalResults, RawMeasurement, RawSatellite};
use crate::error::{IngestionResult, MeasurementError, Violation};
use crate::metrics;
use serde_json::Value;
use shared_types::{
    ComponentResults, DroneEstimate, FinalResults, MeasurementResult, SatelliteEstimate,
};
use tracing::{debug, warn};

/// Job status the measurement service reports on completion.
pub const SUCCESS_STATUS: &str = "success";

/// Stateless validator for measurement results.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementValidator;

impl MeasurementValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate and canonicalize a raw JSON payload.
    pub fn validate(&self, payload: &Value) -> IngestionResult<MeasurementResult> {
        let outcome = self.validate_inner(payload);
        match &outcome {
            Ok(result) => {
                metrics::record_result_accepted();
                debug!(
                    job_id = %result.job_id,
                    carbon_kg = result.final_results.carbon_sequestration_kg,
                    "Measurement result accepted"
                );
            }
            Err(e) => {
                metrics::record_result_rejected(match e {
                    MeasurementError::Malformed { .. } => "malformed",
                    MeasurementError::Invalid { .. } => "invalid",
                });
                warn!(error = %e, "Measurement result rejected");
            }
        }
        outcome
    }

    fn validate_inner(&self, payload: &Value) -> IngestionResult<MeasurementResult> {
        if !payload.is_object() {
            return Err(MeasurementError::Malformed {
                reason: "expected a JSON object".to_string(),
            });
        }

        let mut payload = payload.clone();
        let mut violations = canonicalize(&mut payload);

        let raw: RawMeasurement =
            serde_json::from_value(payload).map_err(|e| MeasurementError::Malformed {
                reason: e.to_string(),
            })?;

        let result = self.check(raw, &mut violations);

        match result {
            Some(result) if violations.is_empty() => Ok(result),
            _ => Err(MeasurementError::Invalid { violations }),
        }
    }

    fn check(
        &self,
        raw: RawMeasurement,
        violations: &mut Vec<Violation>,
    ) -> Option<MeasurementResult> {
        if let Some(status) = raw.status.as_deref() {
            if status != SUCCESS_STATUS {
                violations.push(Violation::NonSuccessStatus(status.to_string()));
            }
        }

        let job_id = match raw.job_id {
            Some(id) if !id.trim().is_empty() => Some(id),
            _ => {
                violations.push(Violation::MissingField("job_id"));
                None
            }
        };

        if let Some(seconds) = raw.processing_time_seconds {
            non_negative("processing_time_seconds", seconds, violations);
        }

        let final_results = match raw.final_results {
            Some(final_results) => check_final_results(final_results, violations),
            None => {
                violations.push(Violation::MissingField("final_results"));
                None
            }
        };

        let component_results =
            check_components(raw.component_results.unwrap_or_default(), violations);

        Some(MeasurementResult {
            job_id: job_id?,
            processing_time_seconds: raw.processing_time_seconds,
            final_results: final_results?,
            component_results,
            integration_weights: raw.integration_weights,
            metadata: raw.metadata,
        })
    }
}

fn check_final_results(
    raw: RawFinalResults,
    violations: &mut Vec<Violation>,
) -> Option<FinalResults> {
    let agb = required("final_results.agb_mg_per_ha", raw.agb_mg_per_ha, violations);
    let carbon = required(
        "final_results.carbon_sequestration_kg",
        raw.carbon_sequestration_kg,
        violations,
    );
    let area = required("final_results.study_area_ha", raw.study_area_ha, violations);

    if let Some(agb) = agb {
        non_negative("final_results.agb_mg_per_ha", agb, violations);
    }
    if let Some(carbon) = carbon {
        non_negative("final_results.carbon_sequestration_kg", carbon, violations);
    }
    if let Some(area) = area {
        if !area.is_finite() {
            violations.push(Violation::NonFinite {
                field: "final_results.study_area_ha",
            });
        } else if area <= 0.0 {
            violations.push(Violation::NonPositiveStudyArea(area));
        }
    }

    Some(FinalResults {
        agb_mg_per_ha: agb?,
        carbon_sequestration_kg: carbon?,
        study_area_ha: area?,
    })
}

fn check_components(raw: RawComponentResults, violations: &mut Vec<Violation>) -> ComponentResults {
    let satellite = raw.satellite.map(|s: RawSatellite| {
        confidence("satellite", s.confidence, violations);
        optional_non_negative("satellite.agb_mg_per_ha", s.agb_mg_per_ha, violations);
        optional_non_negative("satellite.height_m", s.height_m, violations);
        SatelliteEstimate {
            agb_mg_per_ha: s.agb_mg_per_ha,
            height_m: s.height_m,
            confidence: s.confidence,
            n_points: s.n_points,
        }
    });

    let drone = raw.drone.map(|d: RawDrone| {
        confidence("drone", d.confidence, violations);
        optional_non_negative("drone.agb_mg_per_ha", d.agb_mg_per_ha, violations);
        optional_non_negative("drone.area_m2", d.area_m2, violations);
        optional_non_negative("drone.carbon_kg", d.carbon_kg, violations);
        optional_non_negative("drone.co2_kg", d.co2_kg, violations);
        if let Some(openness) = d.openness {
            if !openness.is_finite() {
                violations.push(Violation::NonFinite {
                    field: "drone.openness",
                });
            }
        }
        DroneEstimate {
            agb_mg_per_ha: d.agb_mg_per_ha,
            area_m2: d.area_m2,
            openness: d.openness,
            carbon_kg: d.carbon_kg,
            co2_kg: d.co2_kg,
            confidence: d.confidence,
        }
    });

    ComponentResults { satellite, drone }
}

fn required(field: &'static str, value: Option<f64>, violations: &mut Vec<Violation>) -> Option<f64> {
    if value.is_none() {
        violations.push(Violation::MissingField(field));
    }
    value
}

fn non_negative(field: &'static str, value: f64, violations: &mut Vec<Violation>) {
    if !value.is_finite() {
        violations.push(Violation::NonFinite { field });
    } else if value < 0.0 {
        violations.push(Violation::Negative { field, value });
    }
}

fn optional_non_negative(field: &'static str, value: Option<f64>, violations: &mut Vec<Violation>) {
    if let Some(value) = value {
        non_negative(field, value, violations);
    }
}

fn confidence(component: &'static str, value: Option<f64>, violations: &mut Vec<Violation>) {
    if let Some(value) = value {
        if !(0.0..=1.0).contains(&value) {
            violations.push(Violation::ConfidenceOutOfRange { component, value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_payload() -> Value {
        json!({
            "status": "success",
            "job_id": "job-42",
            "processing_time_seconds": 12.3,
            "final_results": {
                "agb_Mg_per_ha": 85.2,
                "carbon_sequestration_kg": 1250.5,
                "study_area_ha": 2.5
            },
            "component_results": {
                "satellite": { "agb_Mg_per_ha": 80.0, "height_m": 14.2, "confidence": 0.82, "n_points": 120 },
                "drone": { "agb_mg_ha": 90.1, "area_m2": 25000.0, "openness": 0.31,
                           "carbon_kg": 1300.0, "co2_kg": 4771.0, "confidence": 0.91 }
            },
            "integration_weights": { "satellite": 0.4, "drone": 0.6 }
        })
    }

    #[test]
    fn test_valid_payload_is_canonicalized() {
        let result = MeasurementValidator::new().validate(&service_payload()).unwrap();

        assert_eq!(result.job_id, "job-42");
        assert_eq!(result.final_results.agb_mg_per_ha, 85.2);
        assert_eq!(result.final_results.carbon_sequestration_kg, 1250.5);
        let satellite = result.component_results.satellite.unwrap();
        assert_eq!(satellite.agb_mg_per_ha, Some(80.0));
        assert_eq!(satellite.n_points, Some(120));
        let drone = result.component_results.drone.unwrap();
        assert_eq!(drone.agb_mg_per_ha, Some(90.1));
        assert!(result.integration_weights.is_some());
    }

    #[test]
    fn test_camel_case_payload_accepted() {
        let payload = json!({
            "jobId": "job-7",
            "finalResults": { "agbMgPerHa": 10.0, "carbonSequestrationKg": 0.0, "studyAreaHa": 1.0 }
        });
        let result = MeasurementValidator::new().validate(&payload).unwrap();
        assert_eq!(result.final_results.carbon_sequestration_kg, 0.0);
        assert!(result.component_results.satellite.is_none());
    }

    #[test]
    fn test_confidence_above_one_rejected() {
        let mut payload = service_payload();
        payload["component_results"]["drone"]["confidence"] = json!(1.4);

        let err = MeasurementValidator::new().validate(&payload).unwrap_err();

        assert_eq!(
            err.violations(),
            &[Violation::ConfidenceOutOfRange {
                component: "drone",
                value: 1.4
            }]
        );
        assert_eq!(err.kind(), shared_types::ErrorKind::InvalidMlResult);
    }

    #[test]
    fn test_negative_carbon_rejected() {
        let mut payload = service_payload();
        payload["final_results"]["carbon_sequestration_kg"] = json!(-1.0);
        let err = MeasurementValidator::new().validate(&payload).unwrap_err();
        assert!(matches!(
            err.violations(),
            [Violation::Negative { field: "final_results.carbon_sequestration_kg", .. }]
        ));
    }

    #[test]
    fn test_zero_study_area_rejected() {
        let mut payload = service_payload();
        payload["final_results"]["study_area_ha"] = json!(0.0);
        let err = MeasurementValidator::new().validate(&payload).unwrap_err();
        assert_eq!(err.violations(), &[Violation::NonPositiveStudyArea(0.0)]);
    }

    #[test]
    fn test_missing_final_results_reported_with_other_violations() {
        let payload = json!({ "status": "failed", "job_id": "" });
        let err = MeasurementValidator::new().validate(&payload).unwrap_err();
        let violations = err.violations();
        assert!(violations.contains(&Violation::NonSuccessStatus("failed".to_string())));
        assert!(violations.contains(&Violation::MissingField("job_id")));
        assert!(violations.contains(&Violation::MissingField("final_results")));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let payload = json!({ "job_id": "j", "final_results": { "carbon_sequestration_kg": "lots" } });
        let err = MeasurementValidator::new().validate(&payload).unwrap_err();
        assert!(matches!(err, MeasurementError::Malformed { .. }));

        let err = MeasurementValidator::new().validate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, MeasurementError::Malformed { .. }));
    }
}
