//! # Veriflow Node
//!
//! Holds the lifecycle service and the mint pipeline, wired together:
//!
//! ```text
//! ProjectLifecycleService ──get_project──→ LifecycleProjectReader ──→ MintPipeline
//!          │                                                              │
//!   ProjectRepository                                               ContentStore
//! ```
//!
//! The pipeline only reads project records, so approval and minting stay
//! independent: a failed mint leaves the verified project as it is and can
//! simply be prepared again.

use super::config::{ConfigError, NodeConfig};
use crate::adapters::LifecycleProjectReader;
use shared_types::{Actor, ErrorKind, Project, ProjectId, ProjectStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use vf_01_project_lifecycle::{
    InMemoryProjectStore, LifecycleError, ProjectFilter, ProjectLifecycleApi,
    ProjectLifecycleService, ProjectRepository, TransitionRequest,
};
use vf_03_tokenization::{
    ContentStore, FsContentStore, InMemoryContentStore, MintError, MintPayload,
    MintPayloadAssembler, MintPipeline, SellerPortfolio, StoreError, TokenizationApi,
};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Mint(#[from] MintError),

    #[error("Content store error: {0}")]
    Store(#[from] StoreError),
}

impl NodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NodeError::Config(_) => ErrorKind::Validation,
            NodeError::Lifecycle(e) => e.kind(),
            NodeError::Mint(e) => e.kind(),
            NodeError::Store(_) => ErrorKind::Internal,
        }
    }
}

pub type NodeResult<T> = Result<T, NodeError>;

/// Result of a successful approve-and-mint run.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedMint {
    pub project: Project,
    pub payload: MintPayload,
}

pub struct VeriflowNode<R: ProjectRepository, S: ContentStore> {
    lifecycle: Arc<ProjectLifecycleService<R>>,
    tokenization: MintPipeline<LifecycleProjectReader<R>, S>,
}

impl VeriflowNode<InMemoryProjectStore, InMemoryContentStore> {
    /// Node with both stores in memory.
    pub fn in_memory(config: &NodeConfig) -> NodeResult<Self> {
        Self::new(
            config,
            Arc::new(InMemoryProjectStore::new()),
            Arc::new(InMemoryContentStore::new()),
        )
    }
}

impl VeriflowNode<InMemoryProjectStore, FsContentStore> {
    /// Node publishing into `config.storage.data_dir`.
    pub async fn with_fs_store(config: &NodeConfig) -> NodeResult<Self> {
        let store = FsContentStore::open(&config.storage.data_dir).await?;
        Self::new(config, Arc::new(InMemoryProjectStore::new()), Arc::new(store))
    }
}

impl<R: ProjectRepository, S: ContentStore> VeriflowNode<R, S> {
    pub fn new(config: &NodeConfig, repository: Arc<R>, store: Arc<S>) -> NodeResult<Self> {
        config.validate()?;
        let lifecycle = Arc::new(ProjectLifecycleService::new(repository));
        let reader = Arc::new(LifecycleProjectReader::new(lifecycle.clone()));
        let tokenization = MintPipeline::new(reader, store, &config.tokenization())
            .map_err(|e| NodeError::Config(e.into()))?;

        info!(
            network = %config.chain.network_name,
            contract = %config.chain.contract_address,
            price_per_ton = config.pricing.price_per_ton,
            "Veriflow node ready"
        );
        Ok(Self {
            lifecycle,
            tokenization,
        })
    }

    pub fn lifecycle(&self) -> &ProjectLifecycleService<R> {
        &self.lifecycle
    }

    pub fn tokenization(&self) -> &MintPipeline<LifecycleProjectReader<R>, S> {
        &self.tokenization
    }

    /// Load an existing record as-is, e.g. an export from another deployment.
    pub async fn import_project(&self, project: Project) -> NodeResult<()> {
        self.lifecycle
            .repository()
            .insert(project)
            .await
            .map_err(LifecycleError::from)?;
        Ok(())
    }

    /// Approve a project under review and prepare its mint payload.
    ///
    /// The owner address is checked before the approval is written. If the
    /// pipeline fails after approval the project stays verified and
    /// `prepare_mint` can be re-run on its own.
    pub async fn approve_and_prepare_mint(
        &self,
        actor: &Actor,
        id: &ProjectId,
        notes: &str,
        owner_address: &str,
        image: Option<&[u8]>,
    ) -> NodeResult<ApprovedMint> {
        MintPayloadAssembler::check_owner_address(owner_address).map_err(MintError::from)?;

        let project = self
            .lifecycle
            .transition_status(
                actor,
                id,
                ProjectStatus::Verified,
                TransitionRequest::with_notes(notes),
            )
            .await?;
        let payload = self
            .tokenization
            .prepare_mint(&project.id, owner_address, image)
            .await?;

        Ok(ApprovedMint { project, payload })
    }

    /// Marketplace view: verified projects grouped by seller.
    pub async fn seller_portfolio(&self) -> NodeResult<SellerPortfolio> {
        let verified = self
            .lifecycle
            .list_projects(&ProjectFilter::all().with_statuses([ProjectStatus::Verified]))
            .await?;
        Ok(SellerPortfolio::from_projects(
            &verified,
            self.tokenization.pricing(),
        ))
    }
}
