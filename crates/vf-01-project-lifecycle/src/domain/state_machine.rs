//! Project lifecycle state machine
//!
//! Pure edge-validity logic. Who may invoke an edge is decided by the
//! verification gate; this module only answers whether the edge exists.

use serde::{Deserialize, Serialize};
use shared_types::ProjectStatus;
use thiserror::Error;

/// A permitted lifecycle edge.
///
/// State Machine:
/// ```text
/// [DRAFT] ──submit──→ [SUBMITTED] ──begin review──→ [UNDER REVIEW] ──approve──→ [VERIFIED]
///                                                          │
///                                                          └──────reject──────→ [REJECTED]
/// ```
///
/// `Verified` and `Rejected` are terminal. `Approved` has no edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// draft → submitted
    Submit,
    /// submitted → underReview
    BeginReview,
    /// underReview → verified
    Approve,
    /// underReview → rejected
    Reject,
}

impl Transition {
    pub const ALL: [Transition; 4] = [
        Transition::Submit,
        Transition::BeginReview,
        Transition::Approve,
        Transition::Reject,
    ];

    pub fn from_status(&self) -> ProjectStatus {
        match self {
            Transition::Submit => ProjectStatus::Draft,
            Transition::BeginReview => ProjectStatus::Submitted,
            Transition::Approve | Transition::Reject => ProjectStatus::UnderReview,
        }
    }

    pub fn to_status(&self) -> ProjectStatus {
        match self {
            Transition::Submit => ProjectStatus::Submitted,
            Transition::BeginReview => ProjectStatus::UnderReview,
            Transition::Approve => ProjectStatus::Verified,
            Transition::Reject => ProjectStatus::Rejected,
        }
    }

    /// Edges that conclude a review and write the verification record.
    pub fn is_decision(&self) -> bool {
        matches!(self, Transition::Approve | Transition::Reject)
    }
}

/// Requested edge does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid transition: cannot go from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

/// Lifecycle state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateMachine;

impl StateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the edge from `current` to `requested`.
    ///
    /// Deterministic and independent of caller identity.
    pub fn transition(
        &self,
        current: ProjectStatus,
        requested: ProjectStatus,
    ) -> Result<Transition, InvalidTransition> {
        Transition::ALL
            .into_iter()
            .find(|t| t.from_status() == current && t.to_status() == requested)
            .ok_or(InvalidTransition {
                from: current,
                to: requested,
            })
    }

    /// Statuses reachable in one step from `current`.
    pub fn allowed_targets(&self, current: ProjectStatus) -> Vec<ProjectStatus> {
        Transition::ALL
            .into_iter()
            .filter(|t| t.from_status() == current)
            .map(|t| t.to_status())
            .collect()
    }
}
