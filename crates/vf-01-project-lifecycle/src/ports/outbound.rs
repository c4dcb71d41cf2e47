//! # Outbound Ports
//!
//! Persistence dependency of the lifecycle service.

use crate::domain::ProjectFilter;
use async_trait::async_trait;
use shared_types::{Project, ProjectId, ProjectStatus};
use thiserror::Error;

/// Failures reported by a project store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Project not found: {id}")]
    NotFound { id: ProjectId },

    #[error("Project already exists: {id}")]
    AlreadyExists { id: ProjectId },

    /// The stored status moved on since the caller read it.
    #[error("Project {id} status is {actual}, expected {expected}")]
    StatusMismatch {
        id: ProjectId,
        expected: ProjectStatus,
        actual: ProjectStatus,
    },

    /// Another write landed since the caller read the record.
    #[error("Project {id} is at revision {actual}, expected {expected}")]
    RevisionMismatch {
        id: ProjectId,
        expected: u64,
        actual: u64,
    },

    #[error("Storage backend failure: {reason}")]
    Backend { reason: String },
}

/// Project persistence.
///
/// Every write after `insert` is conditional on the status and the revision
/// the caller observed, so two writers racing on the same record cannot both
/// win, whatever fields they touch.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: Project) -> Result<(), RepositoryError>;

    async fn get(&self, id: &ProjectId) -> Result<Project, RepositoryError>;

    /// Replace the record only if its stored status still equals `expected`
    /// and its stored revision still equals `project.revision`. The stored
    /// copy gets the next revision and is returned.
    async fn compare_and_swap(
        &self,
        expected: ProjectStatus,
        project: Project,
    ) -> Result<Project, RepositoryError>;

    /// Remove the record only if it is still at `expected` status and
    /// `revision`.
    async fn delete_if(
        &self,
        id: &ProjectId,
        expected: ProjectStatus,
        revision: u64,
    ) -> Result<(), RepositoryError>;

    /// Matching records, newest first.
    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError>;
}
