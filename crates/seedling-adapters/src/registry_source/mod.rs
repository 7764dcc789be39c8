//! Library registry storage adapters.
//!
//! # Registry file format
//!
//! A single JSON object keyed by library id:
//!
//! ```json
//! {
//!   "bootstrap": {
//!     "name": "Bootstrap",
//!     "description": "CSS framework with JS components",
//!     "css": [{ "src": "https://cdn.example/bootstrap.min.css", "crossorigin": true }],
//!     "js":  [{ "src": "https://cdn.example/bootstrap.bundle.min.js", "defer": true }]
//!   }
//! }
//! ```
//!
//! `name`, `description`, `css` and `js` are all optional. The key `none` is
//! reserved for "no library" and is skipped with a warning.

mod json_file;
mod static_source;

pub use json_file::JsonFileRegistrySource;
pub use static_source::StaticRegistrySource;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use seedling_core::{
    application::ApplicationError,
    domain::{AssetTag, LibraryDefinition, LibraryId, NONE_SELECTION, Registry},
    error::SeedlingError,
};

/// Why a registry document could not be turned into a [`Registry`].
#[derive(Debug, Error)]
pub enum RegistryParseError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value must be an object keyed by library id, found {found}")]
    NotAnObject { found: &'static str },

    #[error("entry '{id}': {reason}")]
    InvalidEntry { id: String, reason: String },
}

impl RegistryParseError {
    /// Wrap as the application error for the given origin.
    pub fn into_load_error(self, origin: impl Into<String>) -> SeedlingError {
        ApplicationError::RegistryLoad {
            origin: origin.into(),
            reason: self.to_string(),
        }
        .into()
    }
}

// ── Record types ──────────────────────────────────────────────────────────────

/// One persisted registry entry.
#[derive(Debug, Deserialize)]
struct LibraryRecord {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    css: Vec<AssetTag>,
    #[serde(default)]
    js: Vec<AssetTag>,
}

/// Parse a registry document from JSON text.
pub fn parse_registry(text: &str) -> Result<Registry, RegistryParseError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(entries) = value else {
        return Err(RegistryParseError::NotAnObject {
            found: json_kind(&value),
        });
    };
    registry_from_entries(entries)
}

fn registry_from_entries(entries: Map<String, Value>) -> Result<Registry, RegistryParseError> {
    let mut registry = Registry::new();

    for (key, value) in entries {
        if key == NONE_SELECTION {
            warn!("registry entry '{NONE_SELECTION}' is reserved and was skipped");
            continue;
        }

        let invalid = |reason: String| RegistryParseError::InvalidEntry {
            id: key.clone(),
            reason,
        };
        let id = LibraryId::new(key.as_str()).map_err(|e| invalid(e.to_string()))?;
        let record: LibraryRecord =
            serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

        debug!(library = %id, css = record.css.len(), js = record.js.len(), "registry entry parsed");
        registry.insert(record.into_definition(id));
    }

    Ok(registry)
}

impl LibraryRecord {
    fn into_definition(self, id: LibraryId) -> LibraryDefinition {
        LibraryDefinition {
            id,
            name: self.name,
            description: self.description,
            css: self.css,
            js: self.js,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_entry() {
        let registry = parse_registry(
            r#"{
                "alpha": {
                    "name": "Alpha",
                    "css": [{ "src": "a.css", "integrity": "sha384-x", "crossorigin": true }],
                    "js": [{ "src": "a.js", "defer": true }]
                }
            }"#,
        )
        .unwrap();

        let alpha = registry.get("alpha").unwrap();
        assert_eq!(alpha.label(), "Alpha");
        assert_eq!(alpha.css[0].integrity.as_deref(), Some("sha384-x"));
        assert!(alpha.css[0].crossorigin);
        assert!(alpha.js[0].defer);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let registry = parse_registry(r#"{ "bare": {} }"#).unwrap();
        let bare = registry.get("bare").unwrap();
        assert!(bare.css.is_empty());
        assert!(bare.js.is_empty());
        assert!(bare.name.is_none());
    }

    #[test]
    fn reserved_none_key_is_skipped() {
        let registry =
            parse_registry(r#"{ "none": { "css": [{ "src": "x.css" }] }, "a": {} }"#).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("none"));
    }

    #[test]
    fn non_object_top_level_is_rejected() {
        let err = parse_registry("[1, 2]").unwrap_err();
        assert!(matches!(err, RegistryParseError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn syntax_error_keeps_serde_message() {
        let err = parse_registry(r#"{ "a": "#).unwrap_err();
        assert!(matches!(err, RegistryParseError::Json(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn entry_missing_src_names_the_entry() {
        let err = parse_registry(r#"{ "a": { "css": [{ "href": "x" }] } }"#).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("entry 'a'"));
        assert!(message.contains("src"));
    }

    #[test]
    fn load_error_carries_origin_and_cause() {
        let err = parse_registry("garbage")
            .unwrap_err()
            .into_load_error("libraries.json");
        let message = err.to_string();
        assert!(message.contains("libraries.json"));
        assert!(message.contains("expected value"));
    }
}
