//! Domain layer: lifecycle rules and inputs, free of storage concerns.

pub mod gate;
pub mod project;
pub mod state_machine;

pub use gate::{Capacity, Decision, DenyReason, Forbidden, RequestedChange, VerificationGate};
pub use project::{ContentUpdate, NewProject, ProjectFilter, DEFAULT_CROP_TYPE};
pub use state_machine::{InvalidTransition, StateMachine, Transition};
