//! # Project Lifecycle Service
//!
//! Implements `ProjectLifecycleApi` over any `ProjectRepository`.
//!
//! Every mutating operation follows the same shape:
//! 1. read the record and remember its status and revision
//! 2. run the pure checks (state machine, gate, validator)
//! 3. build the complete updated record
//! 4. write it with a compare-and-swap on the remembered status and revision
//!
//! A failed check returns before step 4, so nothing is ever partially written.

use crate::domain::{
    project::{crop_or_default, validate_image},
    ContentUpdate, Decision, NewProject, ProjectFilter, RequestedChange, StateMachine,
    VerificationGate,
};
use crate::error::{LifecycleError, LifecycleResult};
use crate::metrics;
use crate::ports::inbound::{ProjectLifecycleApi, TransitionRequest};
use crate::ports::outbound::ProjectRepository;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shared_types::{
    Actor, ErrorKind, OwnerRef, Project, ProjectId, ProjectImage, ProjectStatus,
    VerificationRecord,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vf_02_measurement_ingestion::MeasurementValidator;

pub struct ProjectLifecycleService<R: ProjectRepository> {
    repository: Arc<R>,
    state_machine: StateMachine,
    gate: VerificationGate,
    validator: MeasurementValidator,
}

impl<R: ProjectRepository> ProjectLifecycleService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            state_machine: StateMachine::new(),
            gate: VerificationGate::new(),
            validator: MeasurementValidator::new(),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn check(&self, decision: Decision, project: &Project) -> LifecycleResult<()> {
        decision.into_result().map_err(|forbidden| {
            metrics::record_denial();
            warn!(project_id = %project.id, status = %project.status, reason = %forbidden.reason, "Request denied");
            LifecycleError::from(forbidden)
        })
    }

    /// Conditional write on the status and revision the caller read.
    /// `project.revision` must still be the revision that was read.
    async fn commit(&self, observed: ProjectStatus, project: Project) -> LifecycleResult<Project> {
        let id = project.id.clone();
        let revision = project.revision;
        self.repository
            .compare_and_swap(observed, project)
            .await
            .map_err(|e| {
                let err = LifecycleError::from(e);
                if err.kind() == ErrorKind::Conflict {
                    metrics::record_conflict();
                    warn!(project_id = %id, expected = %observed, revision, "Lost concurrent write");
                }
                err
            })
    }
}

#[async_trait]
impl<R: ProjectRepository> ProjectLifecycleApi for ProjectLifecycleService<R> {
    async fn submit_project(&self, owner: OwnerRef, input: NewProject) -> LifecycleResult<Project> {
        input.validate().map_err(LifecycleError::validation)?;

        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(Uuid::new_v4().simple().to_string()),
            owner,
            title: input.title.trim().to_string(),
            description: input.description,
            location: input.location,
            area_hectares: input.area_hectares,
            crop_type: crop_or_default(input.crop_type.as_ref()),
            start_date: input.start_date,
            end_date: input.end_date,
            estimated_credits: input.estimated_credits.unwrap_or(0.0),
            issued_credits: 0.0,
            status: ProjectStatus::Draft,
            notes: input.notes.unwrap_or_default(),
            images: Vec::new(),
            verification: VerificationRecord::default(),
            field_verification: VerificationRecord::default(),
            ml_analysis_results: None,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
            revision: 0,
        };

        self.repository.insert(project.clone()).await?;
        info!(project_id = %project.id, owner = %project.owner.id, "Project registered");
        Ok(project)
    }

    async fn transition_status(
        &self,
        actor: &Actor,
        id: &ProjectId,
        target: ProjectStatus,
        request: TransitionRequest,
    ) -> LifecycleResult<Project> {
        let project = self.repository.get(id).await?;
        let observed = project.status;

        if let Some(expected) = request.expected_status {
            if expected != observed {
                metrics::record_conflict();
                return Err(LifecycleError::Conflict {
                    project_id: id.clone(),
                    expected,
                    actual: observed,
                });
            }
        }

        let transition = self.state_machine.transition(observed, target)?;
        self.check(
            self.gate.authorize(
                actor,
                &project,
                RequestedChange::ChangeStatus {
                    target,
                    notes: request.notes.as_deref(),
                },
            ),
            &project,
        )?;

        let now = Utc::now();
        let mut updated = project;
        updated.status = target;
        updated.updated_at = now;
        if transition.is_decision() {
            updated.verification = VerificationRecord {
                verified: target == ProjectStatus::Verified,
                verified_by: Some(actor.user_id.clone()),
                verified_at: Some(now),
                notes: request.notes.map(|n| n.trim().to_string()),
            };
        }

        let stored = self.commit(observed, updated).await?;
        metrics::record_transition(target.as_str());
        info!(
            project_id = %id,
            from = %observed,
            to = %target,
            actor = %actor.user_id,
            "Project status changed"
        );
        Ok(stored)
    }

    async fn ingest_ml_result(&self, id: &ProjectId, payload: &Value) -> LifecycleResult<Project> {
        let project = self.repository.get(id).await?;
        let observed = project.status;
        self.check(self.gate.authorize_ingestion(&project), &project)?;

        let result = self.validator.validate(payload).map_err(|e| {
            warn!(project_id = %id, error = %e, "Measurement result refused");
            e
        })?;

        let job_id = result.job_id.clone();
        let mut updated = project;
        updated.ml_analysis_results = Some(result);
        updated.updated_at = Utc::now();

        let stored = self.commit(observed, updated).await?;
        info!(project_id = %id, job_id = %job_id, "Measurement result attached");
        Ok(stored)
    }

    async fn update_content(
        &self,
        actor: &Actor,
        id: &ProjectId,
        update: ContentUpdate,
    ) -> LifecycleResult<Project> {
        let project = self.repository.get(id).await?;
        let observed = project.status;
        self.check(
            self.gate.authorize(actor, &project, RequestedChange::EditContent),
            &project,
        )?;

        let mut updated = update
            .apply_to(&project)
            .map_err(LifecycleError::validation)?;
        updated.updated_at = Utc::now();
        self.commit(observed, updated).await
    }

    async fn attach_image(
        &self,
        actor: &Actor,
        id: &ProjectId,
        image: ProjectImage,
    ) -> LifecycleResult<Project> {
        validate_image(&image).map_err(LifecycleError::validation)?;

        let project = self.repository.get(id).await?;
        let observed = project.status;
        self.check(
            self.gate.authorize(actor, &project, RequestedChange::EditContent),
            &project,
        )?;

        let mut updated = project;
        updated.images.push(image);
        updated.updated_at = Utc::now();
        self.commit(observed, updated).await
    }

    async fn record_field_verification(
        &self,
        actor: &Actor,
        id: &ProjectId,
        notes: &str,
    ) -> LifecycleResult<Project> {
        let project = self.repository.get(id).await?;
        let observed = project.status;
        self.check(
            self.gate.authorize(
                actor,
                &project,
                RequestedChange::RecordFieldVerification { notes: Some(notes) },
            ),
            &project,
        )?;

        let now = Utc::now();
        let mut updated = project;
        updated.field_verification = VerificationRecord {
            verified: true,
            verified_by: Some(actor.user_id.clone()),
            verified_at: Some(now),
            notes: Some(notes.trim().to_string()),
        };
        updated.updated_at = now;

        let stored = self.commit(observed, updated).await?;
        info!(project_id = %id, actor = %actor.user_id, "Field verification recorded");
        Ok(stored)
    }

    async fn delete_project(&self, actor: &Actor, id: &ProjectId) -> LifecycleResult<()> {
        let project = self.repository.get(id).await?;
        self.check(
            self.gate.authorize(actor, &project, RequestedChange::Delete),
            &project,
        )?;
        self.repository
            .delete_if(id, project.status, project.revision)
            .await?;
        info!(project_id = %id, actor = %actor.user_id, "Project deleted");
        Ok(())
    }

    async fn get_project(&self, id: &ProjectId) -> LifecycleResult<Project> {
        Ok(self.repository.get(id).await?)
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> LifecycleResult<Vec<Project>> {
        Ok(self.repository.list(filter).await?)
    }
}
