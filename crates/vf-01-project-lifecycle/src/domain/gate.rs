//! Verification gate
//!
//! Single authorization policy for every edit and transition entrypoint.
//! The caller asks once, before building any updated record; a deny means
//! nothing is written.
//!
//! Rules, evaluated in order:
//! 1. Content edits: owner or admin, only while the project is a draft.
//! 2. Decisions (`verified`/`rejected`): admin only, whoever initiated the request.
//! 3. Approval: an attached measurement with final results, then non-empty notes.
//! 4. Rejection: non-empty notes.

use shared_types::{Actor, FinalResults, Project, ProjectStatus};
use std::fmt;
use thiserror::Error;

/// The capacity in which an actor relates to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Admin,
    Owner,
    Outsider,
}

impl Capacity {
    /// Admin takes precedence over ownership.
    pub fn of(actor: &Actor, project: &Project) -> Self {
        if actor.is_admin() {
            Capacity::Admin
        } else if project.is_owned_by(&actor.user_id) {
            Capacity::Owner
        } else {
            Capacity::Outsider
        }
    }

    fn is_owner_or_admin(&self) -> bool {
        matches!(self, Capacity::Admin | Capacity::Owner)
    }
}

/// A change a caller wants to apply to a project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestedChange<'a> {
    /// Title, description, location, area, crop, dates, notes, images.
    EditContent,
    /// Lifecycle transition with the justification supplied by the caller.
    ChangeStatus {
        target: ProjectStatus,
        notes: Option<&'a str>,
    },
    /// Independent field-operator verification record.
    RecordFieldVerification { notes: Option<&'a str> },
    Delete,
}

/// First unmet precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotOwnerOrAdmin,
    ContentLocked { status: ProjectStatus },
    AdminOnly,
    MissingMeasurement,
    MissingNotes,
    MeasurementLocked { status: ProjectStatus },
    VerifiedProjectImmutable,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NotOwnerOrAdmin => f.write_str("only the owner or an admin may do this"),
            DenyReason::ContentLocked { status } => {
                write!(f, "project content is locked in status {status}")
            }
            DenyReason::AdminOnly => f.write_str("only an admin may verify or reject projects"),
            DenyReason::MissingMeasurement => {
                f.write_str("approval requires measurement final results")
            }
            DenyReason::MissingNotes => f.write_str("verification notes are required"),
            DenyReason::MeasurementLocked { status } => {
                write!(f, "measurement results cannot change in status {status}")
            }
            DenyReason::VerifiedProjectImmutable => {
                f.write_str("a verified project cannot be deleted")
            }
        }
    }
}

/// Role or precondition violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Forbidden: {reason}")]
pub struct Forbidden {
    pub reason: DenyReason,
}

/// Gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Forbidden),
}

impl Decision {
    fn deny(reason: DenyReason) -> Self {
        Decision::Deny(Forbidden { reason })
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), Forbidden> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(forbidden) => Err(forbidden),
        }
    }
}

/// Centralized authorization policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationGate;

impl VerificationGate {
    pub fn new() -> Self {
        Self
    }

    pub fn authorize(
        &self,
        actor: &Actor,
        project: &Project,
        change: RequestedChange<'_>,
    ) -> Decision {
        let capacity = Capacity::of(actor, project);

        match change {
            RequestedChange::EditContent => {
                if !capacity.is_owner_or_admin() {
                    return Decision::deny(DenyReason::NotOwnerOrAdmin);
                }
                if project.status != ProjectStatus::Draft {
                    return Decision::deny(DenyReason::ContentLocked {
                        status: project.status,
                    });
                }
                Decision::Allow
            }
            RequestedChange::ChangeStatus { target, notes } => match target {
                ProjectStatus::Verified | ProjectStatus::Rejected => {
                    if capacity != Capacity::Admin {
                        return Decision::deny(DenyReason::AdminOnly);
                    }
                    if target == ProjectStatus::Verified
                        && !project.final_results().is_some_and(is_usable)
                    {
                        return Decision::deny(DenyReason::MissingMeasurement);
                    }
                    if !has_text(notes) {
                        return Decision::deny(DenyReason::MissingNotes);
                    }
                    Decision::Allow
                }
                _ if capacity.is_owner_or_admin() => Decision::Allow,
                _ => Decision::deny(DenyReason::NotOwnerOrAdmin),
            },
            RequestedChange::RecordFieldVerification { notes } => {
                if capacity != Capacity::Admin {
                    return Decision::deny(DenyReason::AdminOnly);
                }
                if !has_text(notes) {
                    return Decision::deny(DenyReason::MissingNotes);
                }
                Decision::Allow
            }
            RequestedChange::Delete => {
                if !capacity.is_owner_or_admin() {
                    return Decision::deny(DenyReason::NotOwnerOrAdmin);
                }
                if project.status == ProjectStatus::Verified {
                    return Decision::deny(DenyReason::VerifiedProjectImmutable);
                }
                Decision::Allow
            }
        }
    }

    /// Ingestion runs without an end-user actor; only the project state matters.
    pub fn authorize_ingestion(&self, project: &Project) -> Decision {
        match project.status {
            ProjectStatus::Verified | ProjectStatus::Approved => {
                Decision::deny(DenyReason::MeasurementLocked {
                    status: project.status,
                })
            }
            _ => Decision::Allow,
        }
    }
}

fn has_text(notes: Option<&str>) -> bool {
    notes.is_some_and(|n| !n.trim().is_empty())
}

/// Final results fit to back a credit.
fn is_usable(results: &FinalResults) -> bool {
    results.carbon_sequestration_kg.is_finite()
        && results.carbon_sequestration_kg >= 0.0
        && results.study_area_ha.is_finite()
        && results.study_area_ha > 0.0
}
