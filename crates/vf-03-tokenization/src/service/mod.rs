//! Application services.

pub mod pipeline;
pub mod publisher;

pub use pipeline::MintPipeline;
pub use publisher::ContentAddressedPublisher;
