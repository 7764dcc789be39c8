//! Core domain layer for Seedling.
//!
//! Pure logic only: registry entities, markup rendering and splicing, and
//! package descriptor editing. All I/O goes through the ports defined in the
//! application layer.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Text in, text out
//! - **Immutable entities**: Registry data is Clone + PartialEq
pub mod descriptor;
pub mod error;
pub mod library;
pub mod markup;

pub use descriptor::{customize_package_json, package_name_for};
pub use error::{DomainError, ErrorCategory};
pub use library::{
    AssetTag, LibraryDefinition, LibraryId, LibrarySelection, NONE_SELECTION, Registry,
};
pub use markup::{AttributeEscaping, BODY_CLOSE, HEAD_CLOSE, InjectionOutcome, Spliced, splice};
