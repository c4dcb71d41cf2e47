//! Adapters connecting subsystems to each other.

pub mod project_reader;

pub use project_reader::LifecycleProjectReader;
