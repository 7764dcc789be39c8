//! Discovery of the template directory and library registry that ship with
//! Seedling.
//!
//! # Resolution order
//!
//! The template directory and the registry file are resolved independently.
//! The first candidate that exists wins:
//!
//! 1. **Explicit path** from a CLI flag or the config file. Used even if it
//!    does not exist, so the failure is reported against the path the user
//!    asked for.
//! 2. **`$SEEDLING_TEMPLATE_DIR`** / **`$SEEDLING_REGISTRY`**.
//! 3. **`./template`** / **`./libraries.json`** relative to the working
//!    directory.
//! 4. **`<executable-dir>/template`** / **`<executable-dir>/libraries.json`**.
//! 5. **Bundled assets** under this crate's `assets/` directory. The bundled
//!    registry is also compiled into the binary, so registry resolution
//!    always succeeds.
//!
//! ```env
//! SEEDLING_TEMPLATE_DIR=./my-template
//! SEEDLING_REGISTRY=./libraries.json
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use seedling_core::application::ports::RegistrySource;

use crate::registry_source::{JsonFileRegistrySource, StaticRegistrySource};

pub const TEMPLATE_DIR_ENV: &str = "SEEDLING_TEMPLATE_DIR";
pub const REGISTRY_ENV: &str = "SEEDLING_REGISTRY";

const TEMPLATE_DIR_NAME: &str = "template";
const REGISTRY_FILE_NAME: &str = "libraries.json";

/// Registry compiled into the binary.
pub const BUNDLED_REGISTRY: &str = include_str!("../assets/libraries.json");

/// Where a resolved asset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOrigin {
    Explicit(PathBuf),
    Environment(PathBuf),
    WorkingDirectory(PathBuf),
    ExecutableDirectory(PathBuf),
    Bundled(PathBuf),
    /// The registry compiled into the binary.
    Embedded,
}

impl AssetOrigin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p)
            | Self::Environment(p)
            | Self::WorkingDirectory(p)
            | Self::ExecutableDirectory(p)
            | Self::Bundled(p) => Some(p),
            Self::Embedded => None,
        }
    }
}

impl std::fmt::Display for AssetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => f.write_str("built-in registry"),
            other => match other.path() {
                Some(p) => write!(f, "{}", p.display()),
                None => Ok(()),
            },
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve the template directory.
///
/// Falls back to the bundled path even when it is missing (for example an
/// installed binary without sources); the materializer then reports it.
#[instrument(skip_all)]
pub fn resolve_template_dir(explicit: Option<&Path>) -> AssetOrigin {
    let env = std::env::var_os(TEMPLATE_DIR_ENV).map(PathBuf::from);
    let origin = first_existing(candidates(explicit, env, TEMPLATE_DIR_NAME))
        .unwrap_or_else(|| AssetOrigin::Bundled(bundled_assets_dir().join(TEMPLATE_DIR_NAME)));
    info!(template = %origin, "template directory resolved");
    origin
}

/// Resolve the registry file, falling back to the embedded copy.
#[instrument(skip_all)]
pub fn resolve_registry(explicit: Option<&Path>) -> AssetOrigin {
    let env = std::env::var_os(REGISTRY_ENV).map(PathBuf::from);
    let mut all = candidates(explicit, env, REGISTRY_FILE_NAME);
    all.push(AssetOrigin::Bundled(bundled_assets_dir().join(REGISTRY_FILE_NAME)));
    let origin = first_existing(all).unwrap_or(AssetOrigin::Embedded);
    info!(registry = %origin, "library registry resolved");
    origin
}

/// Build a registry source for a resolved origin.
pub fn open_registry(origin: &AssetOrigin) -> Box<dyn RegistrySource> {
    match origin.path() {
        Some(path) => Box::new(JsonFileRegistrySource::new(path)),
        None => Box::new(StaticRegistrySource::from_json(
            origin.to_string(),
            BUNDLED_REGISTRY,
        )),
    }
}

/// `assets/` directory of this crate at build time.
pub fn bundled_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

// ── Resolution helpers ────────────────────────────────────────────────────────

/// Candidates in priority order. The bundled fallback is added by callers.
fn candidates(explicit: Option<&Path>, env: Option<PathBuf>, name: &str) -> Vec<AssetOrigin> {
    let mut out = Vec::with_capacity(4);

    if let Some(path) = explicit {
        out.push(AssetOrigin::Explicit(path.to_path_buf()));
    }
    if let Some(path) = env {
        debug!(path = %path.display(), "candidate from environment");
        out.push(AssetOrigin::Environment(path));
    }
    out.push(AssetOrigin::WorkingDirectory(PathBuf::from(name)));
    if let Some(dir) = exe_dir() {
        out.push(AssetOrigin::ExecutableDirectory(dir.join(name)));
    }
    out
}

fn first_existing(candidates: Vec<AssetOrigin>) -> Option<AssetOrigin> {
    candidates.into_iter().find(|origin| match origin {
        AssetOrigin::Explicit(_) => true,
        other => {
            let exists = other.path().is_some_and(Path::exists);
            debug!(candidate = %other, exists, "checking asset candidate");
            exists
        }
    })
}

/// Directory of the current executable, or `None` if it cannot be determined
/// (some platforms and test runners).
fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
