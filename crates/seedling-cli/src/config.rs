//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SEEDLING_<SECTION>__<KEY>`, e.g.
//!    `SEEDLING_DEFAULTS__LIBRARY=bulma`
//! 3. Config file (`--config`, or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

const ENV_PREFIX: &str = "SEEDLING";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Where the template and registry live.
    pub paths: PathsConfig,
    pub cache: CacheConfig,
    pub inject: InjectConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Library used by `new` when `--library` is not given.
    pub library: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub template_dir: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Registry time-to-live in seconds.
    pub registry_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            registry_ttl_secs: seedling_core::application::DEFAULT_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn registry_ttl(&self) -> Duration {
        Duration::from_secs(self.registry_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    /// HTML-escape injected attribute values.
    pub escape_attributes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also written to a daily-rotated file here.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "seedling.log".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist unless `creating` is set (the
    /// command is about to write it); the default location is optional.
    pub fn load(config_file: Option<&PathBuf>, creating: bool) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), !creating),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "loading configuration");

        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.seedling.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "seedling", "seedling")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".seedling.toml"))
    }

    /// The file `init` and `config set` write to.
    pub fn target_path(explicit: Option<&PathBuf>) -> PathBuf {
        explicit.cloned().unwrap_or_else(Self::config_path)
    }

    /// Look up a dotted key such as `defaults.library`.
    pub fn get(&self, key: &str) -> CliResult<serde_json::Value> {
        let tree = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        lookup(&tree, key)
            .cloned()
            .ok_or_else(|| unknown_key(key))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Set `key` to `raw` in the TOML file at `path`, creating it if needed.
///
/// The value is typed after the key's default (bool, integer or string) and
/// the resulting file must still deserialize into [`AppConfig`].
pub fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let schema = serde_json::to_value(AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    let kind = lookup(&schema, key).ok_or_else(|| unknown_key(key))?;
    let value = typed_value(kind, key, raw)?;

    let mut table = if path.exists() {
        let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
            message: format!("Failed to read config '{}'", path.display()),
            source: e,
        })?;
        text.parse::<toml::Table>().map_err(|e| CliError::ConfigError {
            message: format!("Failed to parse {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    insert_dotted(&mut table, key, value)?;

    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("Invalid value for '{key}': {e}"),
            source: Some(Box::new(e)),
        })?;

    let text = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    write_file(path, &text)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_file(path: &Path, text: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::IoError {
            message: format!("Failed to create config directory '{}'", parent.display()),
            source: e,
        })?;
    }
    fs::write(path, text).map_err(|e| CliError::IoError {
        message: format!("Failed to write config to '{}'", path.display()),
        source: e,
    })
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn lookup<'a>(tree: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.')
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
        .filter(|node| !node.is_object())
}

fn typed_value(kind: &serde_json::Value, key: &str, raw: &str) -> CliResult<toml::Value> {
    let invalid = |expected: &str| CliError::ConfigError {
        message: format!("'{key}' expects {expected}, got '{raw}'"),
        source: None,
    };
    match kind {
        serde_json::Value::Bool(_) => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|_| invalid("true or false")),
        serde_json::Value::Number(_) => raw
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .map(toml::Value::Integer)
            .ok_or_else(|| invalid("a non-negative integer")),
        _ => Ok(toml::Value::String(raw.to_owned())),
    }
}

fn insert_dotted(table: &mut toml::Table, key: &str, value: toml::Value) -> CliResult<()> {
    let mut segments: Vec<&str> = key.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return Err(unknown_key(key));
    };

    let mut current = table;
    for segment in segments {
        let entry = current
            .entry(segment.to_owned())
            .or_insert(toml::Value::Table(toml::Table::new()));
        current = entry.as_table_mut().ok_or_else(|| CliError::ConfigError {
            message: format!("'{segment}' in the config file is not a table"),
            source: None,
        })?;
    }
    current.insert(leaf.to_owned(), value);
    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_has_no_library() {
        let cfg = AppConfig::default();
        assert!(cfg.defaults.library.is_none());
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.cache.registry_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn load_reads_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[defaults]\nlibrary = \"bulma\"\n\n[inject]\nescape_attributes = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path), false).unwrap();
        assert_eq!(cfg.defaults.library.as_deref(), Some("bulma"));
        assert!(cfg.inject.escape_attributes);
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn load_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("absent.toml")), false).is_err());
    }

    #[test]
    fn load_missing_explicit_file_is_fine_when_creating() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load(Some(&temp.path().join("new.toml")), true).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn get_known_key() {
        let mut cfg = AppConfig::default();
        cfg.defaults.library = Some("alpine".into());
        assert_eq!(cfg.get("defaults.library").unwrap(), "alpine");
        assert_eq!(cfg.get("output.no_color").unwrap(), false);
    }

    #[test]
    fn get_unknown_or_section_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            cfg.get("does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(cfg.get("defaults").is_err());
    }

    #[test]
    fn set_value_creates_file_and_types_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        set_value(&path, "defaults.library", "htmx").unwrap();
        set_value(&path, "inject.escape_attributes", "true").unwrap();
        set_value(&path, "cache.registry_ttl_secs", "60").unwrap();

        let cfg = AppConfig::load(Some(&path), false).unwrap();
        assert_eq!(cfg.defaults.library.as_deref(), Some("htmx"));
        assert!(cfg.inject.escape_attributes);
        assert_eq!(cfg.cache.registry_ttl_secs, 60);
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        assert!(set_value(&path, "nope.key", "x").is_err());
        assert!(set_value(&path, "output.no_color", "maybe").is_err());
        assert!(set_value(&path, "cache.registry_ttl_secs", "-5").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn config_path_is_non_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
