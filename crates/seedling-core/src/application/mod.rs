//! Application layer: use cases, the registry cache and the ports they need.

pub mod cache;
pub mod error;
pub mod ports;
pub mod services;

pub use cache::{CacheEntry, Clock, DEFAULT_TTL, RegistryCache, SystemClock};
pub use error::ApplicationError;
pub use services::{
    ConflictPolicy, HtmlInjector, LibraryRegistryLoader, MaterializedTree, PhaseFailure,
    REGISTRY_CACHE_KEY, ScaffoldOptions, ScaffoldPhase, ScaffoldReport, ScaffoldService,
    TemplateMaterializer,
};
