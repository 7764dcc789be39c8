//! Seedling Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Seedling
//! starter-project tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          seedling-cli (CLI)             │
//! │     (prompting, output, exit codes)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, RegistryLoader,      │
//! │   TemplateMaterializer, HtmlInjector)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │      (Filesystem, RegistrySource)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    seedling-adapters (Infrastructure)   │
//! │  (LocalFilesystem, JsonFileRegistry...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Registry, AssetTag, markup splicing)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use seedling_core::prelude::*;
//!
//! # fn demo(filesystem: std::sync::Arc<dyn Filesystem>, source: Box<dyn RegistrySource>) -> SeedlingResult<()> {
//! let options = ScaffoldOptions::new("./assets/template");
//! let service = ScaffoldService::new(filesystem, source, options);
//!
//! let selection = LibrarySelection::parse("bootstrap")?;
//! let target = service.run(Path::new("./my-site"), &selection)?;
//! println!("created {}", target.display());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConflictPolicy, HtmlInjector, LibraryRegistryLoader, MaterializedTree, PhaseFailure,
        RegistryCache, ScaffoldOptions, ScaffoldPhase, ScaffoldReport, ScaffoldService,
        TemplateMaterializer,
        ports::{Filesystem, RegistrySource, TreeEntry},
    };
    pub use crate::domain::{
        AssetTag, AttributeEscaping, InjectionOutcome, LibraryDefinition, LibraryId,
        LibrarySelection, Registry,
    };
    pub use crate::error::{SeedlingError, SeedlingResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
