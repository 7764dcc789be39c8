//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "seedling",
    bin_name = "seedling",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Static site starters with one command",
    long_about = "Seedling copies a ready-to-run HTML/JS starter into a new directory \
                  and can wire a front-end library (CSS and JS from a CDN) into it.",
    after_help = "EXAMPLES:\n\
        \x20 seedling new my-site\n\
        \x20 seedling new my-site --library bootstrap\n\
        \x20 seedling list\n\
        \x20 seedling completions bash > /usr/share/bash-completion/completions/seedling",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the starter template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 seedling new my-site\n\
            \x20 seedling new my-site -l alpine --yes\n\
            \x20 seedling new ../sites/blog --library none --force"
    )]
    New(NewArgs),

    /// List libraries that can be injected.
    #[command(
        visible_alias = "ls",
        about = "List available libraries",
        after_help = "EXAMPLES:\n\
            \x20 seedling list\n\
            \x20 seedling list --format json"
    )]
    List(ListArgs),

    /// Initialise a Seedling configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 seedling init\n\
            \x20 seedling init --force\n\
            \x20 seedling --config ./seedling.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 seedling completions bash > ~/.local/share/bash-completion/completions/seedling\n\
            \x20 seedling completions zsh  > ~/.zfunc/_seedling\n\
            \x20 seedling completions fish > ~/.config/fish/completions/seedling.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Seedling configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 seedling config get defaults.library\n\
            \x20 seedling config set defaults.library bulma\n\
            \x20 seedling config list"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// Commands that may write the config file, so it need not exist yet.
    pub fn creates_config(&self) -> bool {
        matches!(
            self,
            Self::Init(_) | Self::Config(ConfigCommands::Set { .. } | ConfigCommands::Path)
        )
    }
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `seedling new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Directory to create.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "DIR", help = "Target directory")]
    pub dir: PathBuf,

    /// Library to inject, or `none`.
    #[arg(
        short = 'l',
        long = "library",
        value_name = "ID",
        help = "Library to inject (see `seedling list`), or `none`"
    )]
    pub library: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Allow writing into a directory that already holds template files.
    #[arg(long = "force", help = "Overwrite files in an existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Template directory to copy instead of the discovered one.
    #[arg(
        long = "template-dir",
        value_name = "DIR",
        help = "Template directory to copy"
    )]
    pub template_dir: Option<PathBuf>,

    /// Library registry file to use instead of the discovered one.
    #[arg(
        long = "registry",
        value_name = "FILE",
        help = "Library registry JSON file"
    )]
    pub registry: Option<PathBuf>,

    /// HTML-escape `src` and `integrity` values before writing them.
    #[arg(
        long = "escape-attributes",
        help = "HTML-escape injected attribute values"
    )]
    pub escape_attributes: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `seedling list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Library registry file to read.
    #[arg(long = "registry", value_name = "FILE", help = "Library registry JSON file")]
    pub registry: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `seedling init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `seedling completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `seedling config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.library`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
