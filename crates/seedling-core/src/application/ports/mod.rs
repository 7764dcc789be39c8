//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world. Adapters
//! in `seedling-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Directory creation, file copy, read/write, tree walking
//!   - `RegistrySource`: Persisted library registry
//!
//! - **Driving (Input) Ports**: the CLI calls `ScaffoldService` directly.

pub mod output;

pub use output::{EntryKind, Filesystem, RegistrySource, TreeEntry};

#[cfg(test)]
pub use output::MockRegistrySource;
