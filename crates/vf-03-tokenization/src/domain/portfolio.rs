//! Per-seller credit aggregation for the marketplace view.
//!
//! Sums run at full floating precision; round only for display.

use super::pricing::{tons, PricingEngine};
use shared_types::{OwnerRef, Project, ProjectStatus, UserId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SellerSummary {
    pub owner: OwnerRef,
    pub project_count: usize,
    pub total_carbon_kg: f64,
    pub total_tons: f64,
    pub total_value: f64,
    pub total_value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SellerPortfolio {
    /// Sorted by total tons, largest first.
    pub sellers: Vec<SellerSummary>,
}

impl SellerPortfolio {
    /// Group verified projects that carry a measurement by owner.
    pub fn from_projects<'a>(
        projects: impl IntoIterator<Item = &'a Project>,
        pricing: &PricingEngine,
    ) -> Self {
        let mut by_owner: BTreeMap<UserId, SellerSummary> = BTreeMap::new();

        for project in projects {
            if project.status != ProjectStatus::Verified {
                continue;
            }
            let Some(results) = project.final_results() else {
                continue;
            };
            let kg = results.carbon_sequestration_kg;

            let summary = by_owner
                .entry(project.owner.id.clone())
                .or_insert_with(|| SellerSummary {
                    owner: project.owner.clone(),
                    project_count: 0,
                    total_carbon_kg: 0.0,
                    total_tons: 0.0,
                    total_value: 0.0,
                    total_value_usd: 0.0,
                });
            summary.project_count += 1;
            summary.total_carbon_kg += kg;
            summary.total_tons += tons(kg);
            summary.total_value += pricing.price(kg);
            summary.total_value_usd += pricing.reference_value_usd(kg);
        }

        let mut sellers: Vec<SellerSummary> = by_owner.into_values().collect();
        sellers.sort_by(|a, b| b.total_tons.total_cmp(&a.total_tons));
        Self { sellers }
    }

    pub fn total_value(&self) -> f64 {
        self.sellers.iter().map(|s| s.total_value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::PricingConfig;
    use chrono::Utc;
    use shared_types::{FinalResults, MeasurementResult, ProjectId, VerificationRecord};

    fn project(id: &str, owner: &str, status: ProjectStatus, kg: Option<f64>) -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::new(id),
            owner: OwnerRef::new(owner),
            title: id.to_string(),
            description: None,
            location: None,
            area_hectares: None,
            crop_type: "other".to_string(),
            start_date: None,
            end_date: None,
            estimated_credits: 0.0,
            issued_credits: 0.0,
            status,
            notes: String::new(),
            images: vec![],
            verification: VerificationRecord::default(),
            field_verification: VerificationRecord::default(),
            ml_analysis_results: kg.map(|kg| MeasurementResult {
                job_id: format!("job-{id}"),
                processing_time_seconds: None,
                final_results: FinalResults {
                    agb_mg_per_ha: 1.0,
                    carbon_sequestration_kg: kg,
                    study_area_ha: 1.0,
                },
                component_results: Default::default(),
                integration_weights: None,
                metadata: None,
            }),
            metadata: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    #[test]
    fn test_groups_verified_projects_by_owner() {
        let pricing = PricingEngine::new(&PricingConfig::default()).unwrap();
        let projects = vec![
            project("a", "alice", ProjectStatus::Verified, Some(1250.5)),
            project("b", "alice", ProjectStatus::Verified, Some(0.5)),
            project("c", "bob", ProjectStatus::Verified, Some(5000.0)),
            project("d", "bob", ProjectStatus::UnderReview, Some(9000.0)),
            project("e", "carol", ProjectStatus::Verified, None),
        ];

        let portfolio = SellerPortfolio::from_projects(&projects, &pricing);

        assert_eq!(portfolio.sellers.len(), 2);
        assert_eq!(portfolio.sellers[0].owner.id, UserId::new("bob"));
        assert_eq!(portfolio.sellers[0].project_count, 1);
        let alice = &portfolio.sellers[1];
        assert_eq!(alice.project_count, 2);
        assert_eq!(alice.total_carbon_kg, 1251.0);
        assert!((alice.total_tons - 1.251).abs() < 1e-12);
        assert_eq!(portfolio.sellers[0].total_value_usd, 250.0);
    }

    #[test]
    fn test_sums_are_not_rounded_per_project() {
        let pricing = PricingEngine::new(&PricingConfig::default()).unwrap();
        // each price is 0.00002 which rounds to 0.0000 on its own
        let projects: Vec<_> = (0..10)
            .map(|i| project(&format!("p{i}"), "alice", ProjectStatus::Verified, Some(1.0)))
            .collect();
        let portfolio = SellerPortfolio::from_projects(&projects, &pricing);
        assert!((portfolio.total_value() - 0.0002).abs() < 1e-15);
    }
}
