//! Registry stored as a JSON file on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use seedling_core::{application::ports::RegistrySource, domain::Registry, error::SeedlingResult};

use super::{RegistryParseError, parse_registry};

/// Reads the registry from a JSON file each time it is fetched.
///
/// Memoization is the caller's job (see `RegistryCache` in core).
#[derive(Debug, Clone)]
pub struct JsonFileRegistrySource {
    path: PathBuf,
}

impl JsonFileRegistrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Registry, RegistryParseError> {
        let text = fs::read_to_string(&self.path)?;
        debug!(bytes = text.len(), "registry file read");
        parse_registry(&text)
    }
}

impl RegistrySource for JsonFileRegistrySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> SeedlingResult<Registry> {
        self.read()
            .map_err(|e| e.into_load_error(self.describe()))
    }
}
