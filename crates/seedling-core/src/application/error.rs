//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running a scaffold.
///
/// Each variant carries the underlying cause as text so the error stays
/// `Clone` and can travel inside a phase report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// The library registry could not be read or parsed.
    #[error("Failed to load library registry from {origin}: {reason}")]
    RegistryLoad { origin: String, reason: String },

    /// Copying the template into the target failed.
    #[error("Failed to materialize template at {path}: {reason}")]
    Materialize { path: PathBuf, reason: String },

    /// The HTML entry file could not be read or written.
    #[error("Failed to inject assets into {path}: {reason}")]
    InjectionIo { path: PathBuf, reason: String },

    /// The package descriptor could not be read, edited, or written.
    #[error("Failed to customize package descriptor {path}: {reason}")]
    Descriptor { path: PathBuf, reason: String },

    /// Cache access failed (lock poisoned).
    #[error("Registry cache lock poisoned")]
    CacheLock,

    /// The target already holds files the template provides.
    #[error("{path} already contains {}", .conflicts.join(", "))]
    TargetConflict { path: PathBuf, conflicts: Vec<String> },

    /// A library id that is not in the registry was requested.
    #[error("Unknown library '{id}'")]
    UnknownLibrary { id: String, available: Vec<String> },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RegistryLoad { origin, .. } => vec![
                format!("Check that {} exists and is a JSON object", origin),
                "Point at another registry with --registry or $SEEDLING_REGISTRY".into(),
            ],
            Self::Materialize { path, .. } => vec![
                format!("Failed to write into: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check that the template directory exists (--template-dir)".into(),
            ],
            Self::TargetConflict { path, .. } => vec![
                format!("'{}' already has template files", path.display()),
                "Use --force to copy over existing files".into(),
            ],
            Self::InjectionIo { path, .. } => vec![
                format!("Could not rewrite: {}", path.display()),
                "The project was created but no assets were injected".into(),
            ],
            Self::Descriptor { path, .. } => vec![
                format!("Check that {} is valid JSON", path.display()),
            ],
            Self::CacheLock => vec!["Try again in a moment".into()],
            Self::UnknownLibrary { available, .. } => {
                let mut out = vec!["Available libraries:".into()];
                out.extend(available.iter().map(|id| format!("  • {id}")));
                out.push("Use --library none to skip injection".into());
                out
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RegistryLoad { .. } => ErrorCategory::Configuration,
            Self::Materialize { .. } | Self::InjectionIo { .. } | Self::Descriptor { .. } => {
                ErrorCategory::Internal
            }
            Self::CacheLock => ErrorCategory::Internal,
            Self::TargetConflict { .. } => ErrorCategory::Validation,
            Self::UnknownLibrary { .. } => ErrorCategory::NotFound,
        }
    }
}
