//! In-memory project store.
//!
//! Every conditional write runs entirely under the write lock, which makes
//! the status and revision comparison and the replacement one atomic step.

use crate::domain::ProjectFilter;
use crate::ports::outbound::{ProjectRepository, RepositoryError};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Project, ProjectId, ProjectStatus};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }
}

fn check_current(
    stored: &Project,
    expected: ProjectStatus,
    revision: u64,
) -> Result<(), RepositoryError> {
    if stored.status != expected {
        return Err(RepositoryError::StatusMismatch {
            id: stored.id.clone(),
            expected,
            actual: stored.status,
        });
    }
    if stored.revision != revision {
        return Err(RepositoryError::RevisionMismatch {
            id: stored.id.clone(),
            expected: revision,
            actual: stored.revision,
        });
    }
    Ok(())
}

#[async_trait]
impl ProjectRepository for InMemoryProjectStore {
    async fn insert(&self, project: Project) -> Result<(), RepositoryError> {
        let mut projects = self.projects.write();
        if projects.contains_key(&project.id) {
            return Err(RepositoryError::AlreadyExists { id: project.id });
        }
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, RepositoryError> {
        self.projects
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })
    }

    async fn compare_and_swap(
        &self,
        expected: ProjectStatus,
        project: Project,
    ) -> Result<Project, RepositoryError> {
        let mut projects = self.projects.write();
        let stored = projects
            .get_mut(&project.id)
            .ok_or_else(|| RepositoryError::NotFound {
                id: project.id.clone(),
            })?;
        check_current(stored, expected, project.revision)?;
        let mut project = project;
        project.revision = stored.revision + 1;
        *stored = project;
        Ok(stored.clone())
    }

    async fn delete_if(
        &self,
        id: &ProjectId,
        expected: ProjectStatus,
        revision: u64,
    ) -> Result<(), RepositoryError> {
        let mut projects = self.projects.write();
        let stored = projects
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })?;
        check_current(stored, expected, revision)?;
        projects.remove(id);
        Ok(())
    }

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, RepositoryError> {
        let mut matching: Vec<Project> = self
            .projects
            .read()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared_types::{OwnerRef, VerificationRecord};

    fn project(id: &str, owner: &str, age_minutes: i64) -> Project {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Project {
            id: ProjectId::new(id),
            owner: OwnerRef::new(owner),
            title: format!("Project {id}"),
            description: None,
            location: None,
            area_hectares: None,
            crop_type: "other".to_string(),
            start_date: None,
            end_date: None,
            estimated_credits: 0.0,
            issued_credits: 0.0,
            status: ProjectStatus::Draft,
            notes: String::new(),
            images: vec![],
            verification: VerificationRecord::default(),
            field_verification: VerificationRecord::default(),
            ml_analysis_results: None,
            metadata: None,
            created_at: created,
            updated_at: created,
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_twice_fails() {
        let store = InMemoryProjectStore::new();
        store.insert(project("a", "u1", 0)).await.unwrap();
        assert!(matches!(
            store.insert(project("a", "u1", 0)).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_cas_rejects_stale_status() {
        let store = InMemoryProjectStore::new();
        store.insert(project("a", "u1", 0)).await.unwrap();

        let mut updated = project("a", "u1", 0);
        updated.status = ProjectStatus::Submitted;
        let stored = store
            .compare_and_swap(ProjectStatus::Draft, updated.clone())
            .await
            .unwrap();
        assert_eq!(stored.revision, 1);

        let err = store
            .compare_and_swap(ProjectStatus::Draft, updated)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::StatusMismatch {
                id: ProjectId::new("a"),
                expected: ProjectStatus::Draft,
                actual: ProjectStatus::Submitted,
            }
        );
    }

    #[tokio::test]
    async fn test_cas_rejects_stale_revision_at_same_status() {
        let store = InMemoryProjectStore::new();
        store.insert(project("a", "u1", 0)).await.unwrap();

        let mut first = project("a", "u1", 0);
        first.title = "First edit".to_string();
        let mut second = project("a", "u1", 0);
        second.title = "Second edit".to_string();

        store
            .compare_and_swap(ProjectStatus::Draft, first)
            .await
            .unwrap();
        let err = store
            .compare_and_swap(ProjectStatus::Draft, second)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::RevisionMismatch {
                id: ProjectId::new("a"),
                expected: 0,
                actual: 1,
            }
        );
        assert_eq!(
            store.get(&ProjectId::new("a")).await.unwrap().title,
            "First edit"
        );
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filter() {
        let store = InMemoryProjectStore::new();
        store.insert(project("old", "u1", 30)).await.unwrap();
        store.insert(project("new", "u1", 1)).await.unwrap();
        store.insert(project("other", "u2", 5)).await.unwrap();

        let all = store.list(&ProjectFilter::all()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["new", "other", "old"]);

        let mine = store
            .list(&ProjectFilter::owned_by(shared_types::UserId::new("u1")))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let none = store
            .list(&ProjectFilter::all().with_statuses([ProjectStatus::Verified]))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_delete_if_checks_status() {
        let store = InMemoryProjectStore::new();
        store.insert(project("a", "u1", 0)).await.unwrap();
        assert!(store
            .delete_if(&ProjectId::new("a"), ProjectStatus::Submitted, 0)
            .await
            .is_err());
        assert!(matches!(
            store
                .delete_if(&ProjectId::new("a"), ProjectStatus::Draft, 3)
                .await,
            Err(RepositoryError::RevisionMismatch { .. })
        ));
        store
            .delete_if(&ProjectId::new("a"), ProjectStatus::Draft, 0)
            .await
            .unwrap();
        assert!(store.is_empty());
    }
}
