//! Content store adapters.

pub mod fs_store;
pub mod memory_store;

pub use fs_store::FsContentStore;
pub use memory_store::InMemoryContentStore;
