//! Template materialization: copy a fixed template tree into a target.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem},
    },
    error::SeedlingResult,
};

/// What to do when the target already holds a file the template provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Copy over same-named files and leave everything else in place.
    #[default]
    Overwrite,
    /// Refuse before writing anything if any template file already exists
    /// in the target.
    Reject,
}

/// Relative paths produced by one materialization, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializedTree {
    pub root: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl MaterializedTree {
    pub fn contains_file(&self, relative: &Path) -> bool {
        self.files.iter().any(|f| f == relative)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Copies the template rooted at `template_root` into target directories.
pub struct TemplateMaterializer {
    filesystem: Arc<dyn Filesystem>,
    template_root: PathBuf,
    policy: ConflictPolicy,
}

impl TemplateMaterializer {
    pub fn new(filesystem: Arc<dyn Filesystem>, template_root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            template_root: template_root.into(),
            policy: ConflictPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Fail with `TargetConflict` if the policy is `Reject` and `target`
    /// already holds any template file. Writes nothing.
    pub fn check_target(&self, target: &Path) -> SeedlingResult<()> {
        if self.policy != ConflictPolicy::Reject {
            return Ok(());
        }
        let entries = self
            .filesystem
            .walk(&self.template_root)
            .map_err(|e| fail(&self.template_root, "read template", e))?;
        let files = entries.iter().filter(|e| !e.is_dir()).map(|e| &e.relative);
        self.check_conflicts(target, files)
    }

    /// Ensure `target` exists and copy every template entry into it.
    ///
    /// File contents are copied byte-for-byte. On failure the target is left
    /// as-is; nothing is rolled back.
    #[instrument(skip(self), fields(template = %self.template_root.display(), target = %target.display()))]
    pub fn materialize(&self, target: &Path) -> SeedlingResult<MaterializedTree> {
        let entries = self
            .filesystem
            .walk(&self.template_root)
            .map_err(|e| fail(&self.template_root, "read template", e))?;

        if self.policy == ConflictPolicy::Reject {
            let files = entries.iter().filter(|e| !e.is_dir()).map(|e| &e.relative);
            self.check_conflicts(target, files)?;
        }

        self.filesystem
            .create_dir_all(target)
            .map_err(|e| fail(target, "create target directory", e))?;

        let mut tree = MaterializedTree {
            root: target.to_path_buf(),
            ..MaterializedTree::default()
        };

        for entry in entries {
            let destination = target.join(&entry.relative);
            match entry.kind {
                EntryKind::Directory => {
                    self.filesystem
                        .create_dir_all(&destination)
                        .map_err(|e| fail(&destination, "create directory", e))?;
                    tree.directories.push(entry.relative);
                }
                EntryKind::File => {
                    if let Some(parent) = destination.parent() {
                        self.filesystem
                            .create_dir_all(parent)
                            .map_err(|e| fail(parent, "create directory", e))?;
                    }
                    let source = self.template_root.join(&entry.relative);
                    self.filesystem
                        .copy_file(&source, &destination)
                        .map_err(|e| fail(&destination, "copy file", e))?;
                    debug!(file = %entry.relative.display(), "copied");
                    tree.files.push(entry.relative);
                }
            }
        }

        info!(
            files = tree.files.len(),
            directories = tree.directories.len(),
            "template materialized"
        );
        Ok(tree)
    }

    fn check_conflicts<'a>(
        &self,
        target: &Path,
        files: impl Iterator<Item = &'a PathBuf>,
    ) -> SeedlingResult<()> {
        let conflicts: Vec<String> = files
            .filter(|rel| self.filesystem.exists(&target.join(rel)))
            .map(|rel| rel.display().to_string())
            .collect();

        if conflicts.is_empty() {
            return Ok(());
        }
        Err(ApplicationError::TargetConflict {
            path: target.to_path_buf(),
            conflicts,
        }
        .into())
    }
}

fn fail(path: &Path, operation: &str, e: io::Error) -> crate::error::SeedlingError {
    ApplicationError::Materialize {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
