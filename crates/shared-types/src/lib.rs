//! # Shared Types Crate
//!
//! This crate contains the project record, its lifecycle status, the
//! canonical measurement model and the error taxonomy shared by every
//! Veriflow subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **One Name Per Quantity**: The measurement model is the canonical form
//!   produced by ingestion; no downstream code sees source-service spellings.
//! - **Closed Roles**: Authorization works on the `Role` enum, never on strings.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
