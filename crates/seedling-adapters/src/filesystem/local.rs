//! Local filesystem adapter using std::fs.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::trace;
use walkdir::WalkDir;

use seedling_core::application::ports::{Filesystem, TreeEntry};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let bytes = fs::copy(from, to)?;
        trace!(from = %from.display(), to = %to.display(), bytes, "file copied");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            ));
        }

        // Linked directories are walked as real ones; a link cycle is an error.
        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            let relative = relative_to(root, entry.path())?;
            if entry.file_type().is_dir() {
                entries.push(TreeEntry::directory(relative));
            } else {
                entries.push(TreeEntry::file(relative));
            }
        }
        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}

fn relative_to(root: &Path, path: &Path) -> io::Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|e| io::Error::other(e.to_string()))
}
