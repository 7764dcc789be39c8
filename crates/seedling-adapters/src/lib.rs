//! Infrastructure adapters for Seedling.
//!
//! This crate implements the ports defined in `seedling-core::application::ports`
//! and knows where the bundled template and library registry live.
//! It contains all external dependencies and I/O operations.

pub mod builtin;
pub mod filesystem;
pub mod registry_source;

// Re-export commonly used adapters
pub use builtin::{AssetOrigin, open_registry, resolve_registry, resolve_template_dir};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use registry_source::{JsonFileRegistrySource, StaticRegistrySource};
