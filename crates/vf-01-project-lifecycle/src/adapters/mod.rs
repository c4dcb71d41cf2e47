//! Adapters implementing the outbound ports.

pub mod memory_store;

pub use memory_store::InMemoryProjectStore;
