//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `seedling-adapters` crate provides implementations.

use std::io;
use std::path::{Path, PathBuf};

use crate::domain::Registry;
use crate::error::SeedlingResult;

/// Kind of a walked tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry found while walking a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the walked root.
    pub relative: PathBuf,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn directory(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            kind: EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `seedling_adapters::filesystem::LocalFilesystem` (production)
/// - `seedling_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Methods return raw `io::Result`; each service maps failures to the error
/// of the phase it is running.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read a whole UTF-8 file.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Copy a file byte-for-byte, replacing the destination if present.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// List every entry under `root`, relative to it.
    ///
    /// Entries are sorted by path so a directory always precedes its
    /// contents. Fails with `NotFound` if `root` does not exist.
    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>>;
}

/// Port for the persisted library registry.
///
/// Implemented by:
/// - `seedling_adapters::registry_source::JsonFileRegistrySource` (registry file)
/// - `seedling_adapters::registry_source::StaticRegistrySource` (bundled/testing)
#[cfg_attr(test, mockall::automock)]
pub trait RegistrySource: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    /// Read and parse the registry.
    ///
    /// Fails with `ApplicationError::RegistryLoad` carrying the cause.
    fn fetch(&self) -> SeedlingResult<Registry>;
}
