//! In-crate filesystem double for service unit tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::application::ports::{Filesystem, TreeEntry};

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    fail_under: Option<PathBuf>,
    reads: usize,
    writes: usize,
}

#[derive(Default)]
pub(crate) struct StubFilesystem {
    state: Mutex<State>,
}

impl StubFilesystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    pub(crate) fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), content.to_owned());
    }

    pub(crate) fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }

    /// Make every write at or below `prefix` fail with `PermissionDenied`.
    pub(crate) fn fail_writes_under(&self, prefix: impl Into<PathBuf>) {
        self.state.lock().unwrap().fail_under = Some(prefix.into());
    }

    pub(crate) fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub(crate) fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    fn check_writable(state: &State, path: &Path) -> io::Result<()> {
        match &state.fail_under {
            Some(prefix) if path.starts_with(prefix) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
            _ => Ok(()),
        }
    }

    fn check_parent(state: &State, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !state.dirs.contains(parent) => {
                Err(io::Error::new(io::ErrorKind::NotFound, "parent directory missing"))
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for StubFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        {
            let state = self.state.lock().unwrap();
            Self::check_writable(&state, path)?;
        }
        self.add_dir(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state, path)?;
        Self::check_parent(&state, path)?;
        state.writes += 1;
        state.files.insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_writable(&state, to)?;
        Self::check_parent(&state, to)?;
        let content = state
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        state.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<TreeEntry>> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(root) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        let dirs = state
            .dirs
            .iter()
            .filter(|d| d.as_path() != root)
            .filter_map(|d| d.strip_prefix(root).ok())
            .map(TreeEntry::directory);
        let files = state
            .files
            .keys()
            .filter_map(|f| f.strip_prefix(root).ok())
            .map(TreeEntry::file);
        let mut entries: Vec<TreeEntry> = dirs.chain(files).collect();
        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}
