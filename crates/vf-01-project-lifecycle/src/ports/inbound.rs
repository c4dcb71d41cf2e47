//! # Inbound Ports
//!
//! Operations the lifecycle service offers to its driving adapters.

use crate::domain::{ContentUpdate, NewProject, ProjectFilter};
use crate::error::LifecycleResult;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::{Actor, OwnerRef, Project, ProjectId, ProjectImage, ProjectStatus};

/// Caller-supplied context for a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Justification. Required for `verified` and `rejected`.
    pub notes: Option<String>,
    /// Status the caller last observed. When present, a mismatch with the
    /// stored status is reported as a conflict before any other check.
    pub expected_status: Option<ProjectStatus>,
}

impl TransitionRequest {
    pub fn with_notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            expected_status: None,
        }
    }

    pub fn expecting(mut self, status: ProjectStatus) -> Self {
        self.expected_status = Some(status);
        self
    }
}

/// Project lifecycle API.
#[async_trait]
pub trait ProjectLifecycleApi: Send + Sync {
    /// Register a new project in `draft`.
    async fn submit_project(&self, owner: OwnerRef, input: NewProject) -> LifecycleResult<Project>;

    /// Move a project along the lifecycle.
    async fn transition_status(
        &self,
        actor: &Actor,
        id: &ProjectId,
        target: ProjectStatus,
        request: TransitionRequest,
    ) -> LifecycleResult<Project>;

    /// Validate and attach a measurement result. No end-user actor involved.
    async fn ingest_ml_result(&self, id: &ProjectId, payload: &Value) -> LifecycleResult<Project>;

    async fn update_content(
        &self,
        actor: &Actor,
        id: &ProjectId,
        update: ContentUpdate,
    ) -> LifecycleResult<Project>;

    async fn attach_image(
        &self,
        actor: &Actor,
        id: &ProjectId,
        image: ProjectImage,
    ) -> LifecycleResult<Project>;

    /// Record an on-site verification. Does not change status.
    async fn record_field_verification(
        &self,
        actor: &Actor,
        id: &ProjectId,
        notes: &str,
    ) -> LifecycleResult<Project>;

    async fn delete_project(&self, actor: &Actor, id: &ProjectId) -> LifecycleResult<()>;

    async fn get_project(&self, id: &ProjectId) -> LifecycleResult<Project>;

    async fn list_projects(&self, filter: &ProjectFilter) -> LifecycleResult<Vec<Project>>;
}
