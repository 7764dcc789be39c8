//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use seedling_core::application::ports::{Filesystem, TreeEntry};

/// In-memory filesystem for testing.
///
/// Clones share the same storage, so a test can keep a handle while the
/// service under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            inner.insert_dir(parent);
        }
        inner.files.insert(path.to_path_buf(), content.into());
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read_bytes(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Read a file's raw bytes (testing helper).
    pub fn read_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        self.read().files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.files.clear();
        inner.directories.clear();
    }

    // A panic while holding the lock cannot leave the maps half-updated, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl MemoryFilesystemInner {
    fn insert_dir(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("parent directory {} does not exist", parent.display()),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.write().insert_dir(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read_bytes(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut inner = self.write();
        inner.ensure_parent(path)?;
        inner
            .files
            .insert(path.to_path_buf(), content.as_bytes().to_vec());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut inner = self.write();
        inner.ensure_parent(to)?;
        let bytes = inner.files.get(from).cloned().ok_or_else(|| not_found(from))?;
        inner.files.insert(to.to_path_buf(), bytes);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>> {
        let inner = self.read();
        if !inner.directories.contains(root) {
            return Err(not_found(root));
        }

        let directories = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(TreeEntry::directory);
        let files = inner
            .files
            .keys()
            .filter_map(|f| f.strip_prefix(root).ok())
            .map(TreeEntry::file);

        let mut entries: Vec<TreeEntry> = directories.chain(files).collect();
        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}
