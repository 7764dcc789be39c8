// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside phase reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid library definition: {0}")]
    InvalidLibrary(String),

    #[error("Library id '{id}' is reserved")]
    ReservedLibraryId { id: String },

    #[error("Invalid package descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidLibrary(msg) => vec![
                "Check the library registry file".into(),
                format!("Details: {}", msg),
            ],
            Self::ReservedLibraryId { id } => vec![
                format!("'{}' means \"no library\" and cannot name a registry entry", id),
                "Rename the entry in the registry file".into(),
            ],
            Self::InvalidDescriptor(_) => vec![
                "The template's package.json must be a JSON object".into(),
                "Fix the template or point --template-dir at a valid one".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Add the '{}' field and try again", field)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLibrary(_)
            | Self::ReservedLibraryId { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::InvalidDescriptor(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
