//! Command handlers, one module per subcommand.

use std::path::PathBuf;

use seedling_adapters::{AssetOrigin, resolve_registry, resolve_template_dir};

use crate::config::AppConfig;

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;

/// Registry location: the flag, then `paths.registry`, then discovery.
pub(crate) fn registry_origin(flag: Option<PathBuf>, config: &AppConfig) -> AssetOrigin {
    let explicit = flag.or_else(|| config.paths.registry.clone());
    resolve_registry(explicit.as_deref())
}

/// Template location: the flag, then `paths.template_dir`, then discovery.
pub(crate) fn template_origin(flag: Option<PathBuf>, config: &AppConfig) -> AssetOrigin {
    let explicit = flag.or_else(|| config.paths.template_dir.clone());
    resolve_template_dir(explicit.as_deref())
}
