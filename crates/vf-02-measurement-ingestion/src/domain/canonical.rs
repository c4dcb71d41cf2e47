//! Field-name canonicalization
//!
//! The measurement service spells the same quantity differently across its
//! top-level and nested objects (`agb_Mg_per_ha`, `agbMgPerHa`, `agb_mg_ha`),
//! and callers relaying its output mix camelCase and snake_case. This pass
//! rewrites every known spelling to one snake_case key before the payload is
//! deserialized, so the typed model never branches on naming variants.
//!
//! Opaque sub-objects (`integration_weights`, `metadata`) are left untouched.

use crate::error::Violation;
use serde_json::{Map, Value};

/// Top-level keys.
const ENVELOPE_ALIASES: &[(&str, &str)] = &[
    ("jobId", "job_id"),
    ("processingTimeSeconds", "processing_time_seconds"),
    ("finalResults", "final_results"),
    ("componentResults", "component_results"),
    ("integrationWeights", "integration_weights"),
];

/// Keys inside `final_results` and the component estimates.
const QUANTITY_ALIASES: &[(&str, &str)] = &[
    ("agb_Mg_per_ha", "agb_mg_per_ha"),
    ("agbMgPerHa", "agb_mg_per_ha"),
    ("agb_mg_ha", "agb_mg_per_ha"),
    ("carbonSequestrationKg", "carbon_sequestration_kg"),
    ("studyAreaHa", "study_area_ha"),
    ("heightM", "height_m"),
    ("nPoints", "n_points"),
    ("areaM2", "area_m2"),
    ("carbonKg", "carbon_kg"),
    ("co2Kg", "co2_kg"),
];

/// Rewrite a raw measurement payload in place to canonical key names.
///
/// Returns the aliasing conflicts found: the same quantity supplied under two
/// spellings with different values. Equal duplicates collapse silently.
pub fn canonicalize(payload: &mut Value) -> Vec<Violation> {
    let mut conflicts = Vec::new();
    let Some(root) = payload.as_object_mut() else {
        return conflicts;
    };

    rename_keys(root, ENVELOPE_ALIASES, &mut conflicts);

    if let Some(Value::Object(final_results)) = root.get_mut("final_results") {
        rename_keys(final_results, QUANTITY_ALIASES, &mut conflicts);
    }

    if let Some(Value::Object(components)) = root.get_mut("component_results") {
        for component in ["satellite", "drone"] {
            if let Some(Value::Object(estimate)) = components.get_mut(component) {
                rename_keys(estimate, QUANTITY_ALIASES, &mut conflicts);
            }
        }
    }

    conflicts
}

fn rename_keys(
    object: &mut Map<String, Value>,
    aliases: &[(&str, &'static str)],
    conflicts: &mut Vec<Violation>,
) {
    for &(alias, canonical) in aliases {
        let Some(value) = object.remove(alias) else {
            continue;
        };
        match object.get(canonical) {
            Some(existing) if existing != &value => {
                conflicts.push(Violation::ConflictingAliases { field: canonical });
            }
            Some(_) => {}
            None => {
                object.insert(canonical.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_biomass_spellings_collapse_to_one_name() {
        let mut payload = json!({
            "jobId": "job-1",
            "final_results": { "agb_Mg_per_ha": 12.5 },
            "component_results": {
                "satellite": { "agbMgPerHa": 10.0 },
                "drone": { "agb_mg_ha": 15.0 }
            }
        });

        let conflicts = canonicalize(&mut payload);

        assert!(conflicts.is_empty());
        assert_eq!(payload["job_id"], json!("job-1"));
        assert_eq!(payload["final_results"]["agb_mg_per_ha"], json!(12.5));
        assert_eq!(
            payload["component_results"]["satellite"]["agb_mg_per_ha"],
            json!(10.0)
        );
        assert_eq!(
            payload["component_results"]["drone"]["agb_mg_per_ha"],
            json!(15.0)
        );
        assert!(payload["final_results"].get("agb_Mg_per_ha").is_none());
    }

    #[test]
    fn test_equal_duplicates_are_accepted() {
        let mut payload = json!({
            "final_results": { "agb_Mg_per_ha": 3.0, "agb_mg_per_ha": 3.0 }
        });
        assert!(canonicalize(&mut payload).is_empty());
        assert_eq!(payload["final_results"]["agb_mg_per_ha"], json!(3.0));
    }

    #[test]
    fn test_differing_duplicates_are_reported() {
        let mut payload = json!({
            "final_results": { "agb_Mg_per_ha": 3.0, "agbMgPerHa": 4.0 }
        });
        let conflicts = canonicalize(&mut payload);
        assert_eq!(
            conflicts,
            vec![Violation::ConflictingAliases {
                field: "agb_mg_per_ha"
            }]
        );
    }

    #[test]
    fn test_opaque_objects_untouched() {
        let mut payload = json!({
            "metadata": { "agbMgPerHa": 1.0 },
            "integrationWeights": { "satellite": 0.4, "drone": 0.6 }
        });
        canonicalize(&mut payload);
        assert_eq!(payload["metadata"]["agbMgPerHa"], json!(1.0));
        assert_eq!(payload["integration_weights"]["drone"], json!(0.6));
    }
}
