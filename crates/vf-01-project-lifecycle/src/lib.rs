//! # vf-01-project-lifecycle
//!
//! Lifecycle of a carbon-sequestration project record, from registration to
//! the administrative verification decision.
//!
//! ## State Machine
//!
//! ```text
//! [DRAFT] ──submit──→ [SUBMITTED] ──review──→ [UNDER REVIEW] ──┬──approve──→ [VERIFIED]
//!                                                              └──reject───→ [REJECTED]
//! ```
//!
//! | Edge | Who | Preconditions |
//! |------|-----|---------------|
//! | draft → submitted | owner, admin | |
//! | submitted → underReview | owner, admin | |
//! | underReview → verified | admin | measurement final results, notes |
//! | underReview → rejected | admin | notes |
//!
//! ## Concurrency
//!
//! The project record is the only shared mutable resource. Every write goes
//! through `ProjectRepository::compare_and_swap` on the status and revision
//! the service read; the losing writer receives an error of kind
//! `ErrorKind::Conflict` and must re-fetch.
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  adapters/ - InMemoryProjectStore                           │
//! └─────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ProjectLifecycleApi                    │
//! │  ports/outbound.rs - ProjectRepository                      │
//! └─────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────┐
//! │  domain/state_machine.rs - edge validity                    │
//! │  domain/gate.rs          - VerificationGate policy          │
//! │  domain/project.rs       - registration and edit inputs     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use vf_01_project_lifecycle::{ProjectLifecycleService, InMemoryProjectStore, TransitionRequest};
//!
//! let service = ProjectLifecycleService::new(Arc::new(InMemoryProjectStore::new()));
//! let project = service.submit_project(owner, NewProject::titled("Teak plot")).await?;
//! service
//!     .transition_status(&owner_actor, &project.id, ProjectStatus::Submitted, TransitionRequest::default())
//!     .await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::InMemoryProjectStore;
pub use domain::{
    Capacity, ContentUpdate, Decision, DenyReason, Forbidden, InvalidTransition, NewProject,
    ProjectFilter, RequestedChange, StateMachine, Transition, VerificationGate,
    DEFAULT_CROP_TYPE,
};
pub use error::{LifecycleError, LifecycleResult};
pub use ports::{ProjectLifecycleApi, ProjectRepository, RepositoryError, TransitionRequest};
pub use service::ProjectLifecycleService;
