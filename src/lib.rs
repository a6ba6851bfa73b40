//! Operator sample generation: drive a scaffolding CLI, then patch what it generates.

pub mod config;
pub mod observability;
pub mod patch;
pub mod preflight;
pub mod sample;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use patch::{PatchError, PatchMode};
pub use sample::SampleContext;
