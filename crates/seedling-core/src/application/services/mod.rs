//! Application services (use cases).
//!
//! Each service composes domain logic with ports. [`ScaffoldService`] is the
//! entry point; the others are the phases it runs.

pub mod injector;
pub mod materializer;
pub mod registry_loader;
pub mod scaffold_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use injector::HtmlInjector;
pub use materializer::{ConflictPolicy, MaterializedTree, TemplateMaterializer};
pub use registry_loader::{LibraryRegistryLoader, REGISTRY_CACHE_KEY};
pub use scaffold_service::{
    PhaseFailure, ScaffoldOptions, ScaffoldPhase, ScaffoldReport, ScaffoldService,
};
