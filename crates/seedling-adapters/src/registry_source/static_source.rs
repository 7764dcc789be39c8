//! Registry held in memory.

use std::borrow::Cow;

use seedling_core::{application::ports::RegistrySource, domain::Registry, error::SeedlingResult};

use super::parse_registry;

enum Contents {
    Json(Cow<'static, str>),
    Parsed(Registry),
}

/// A registry that never touches the filesystem.
///
/// Used for registries compiled into the binary and in tests.
pub struct StaticRegistrySource {
    label: String,
    contents: Contents,
}

impl StaticRegistrySource {
    /// Parse `json` on every fetch, like a file source would.
    pub fn from_json(label: impl Into<String>, json: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            contents: Contents::Json(json.into()),
        }
    }

    /// Serve a prebuilt registry.
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            label: "in-memory registry".to_owned(),
            contents: Contents::Parsed(registry),
        }
    }
}

impl RegistrySource for StaticRegistrySource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self) -> SeedlingResult<Registry> {
        match &self.contents {
            Contents::Json(json) => {
                parse_registry(json).map_err(|e| e.into_load_error(self.label.as_str()))
            }
            Contents::Parsed(registry) => Ok(registry.clone()),
        }
    }
}
