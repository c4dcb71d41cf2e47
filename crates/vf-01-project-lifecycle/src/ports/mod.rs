//! Ports (hexagonal boundaries).

pub mod inbound;
pub mod outbound;

pub use inbound::{ProjectLifecycleApi, TransitionRequest};
pub use outbound::{ProjectRepository, RepositoryError};
