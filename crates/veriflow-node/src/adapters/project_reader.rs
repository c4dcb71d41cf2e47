//! # Project Reader Adapter
//!
//! Lets the mint pipeline read project records through the lifecycle
//! service, never through the repository directly.

use async_trait::async_trait;
use shared_types::{Project, ProjectId};
use std::sync::Arc;
use vf_01_project_lifecycle::{
    LifecycleError, ProjectLifecycleApi, ProjectLifecycleService, ProjectRepository,
};
use vf_03_tokenization::{ProjectReader, ReadError};

pub struct LifecycleProjectReader<R: ProjectRepository> {
    lifecycle: Arc<ProjectLifecycleService<R>>,
}

impl<R: ProjectRepository> LifecycleProjectReader<R> {
    pub fn new(lifecycle: Arc<ProjectLifecycleService<R>>) -> Self {
        Self { lifecycle }
    }
}

#[async_trait]
impl<R: ProjectRepository> ProjectReader for LifecycleProjectReader<R> {
    async fn project(&self, id: &ProjectId) -> Result<Project, ReadError> {
        self.lifecycle.get_project(id).await.map_err(|e| match e {
            LifecycleError::NotFound { project_id } => ReadError::NotFound { id: project_id },
            other => ReadError::Backend {
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::OwnerRef;
    use vf_01_project_lifecycle::{InMemoryProjectStore, NewProject};

    #[tokio::test]
    async fn test_reads_through_lifecycle() {
        let lifecycle = Arc::new(ProjectLifecycleService::new(Arc::new(
            InMemoryProjectStore::new(),
        )));
        let project = lifecycle
            .submit_project(OwnerRef::new("farmer-1"), NewProject::titled("Teak plot"))
            .await
            .unwrap();
        let reader = LifecycleProjectReader::new(lifecycle);

        assert_eq!(reader.project(&project.id).await.unwrap(), project);
        assert!(matches!(
            reader.project(&ProjectId::new("missing")).await,
            Err(ReadError::NotFound { .. })
        ));
    }
}
