//! Implementation of the `seedling new` command.
//!
//! Responsibility: turn CLI arguments and config into `ScaffoldOptions` and a
//! `LibrarySelection`, run the core scaffold service, and display results.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use seedling_adapters::{AssetOrigin, LocalFilesystem, open_registry};
use seedling_core::{
    application::{
        ApplicationError, ConflictPolicy, ScaffoldOptions, ScaffoldReport, ScaffoldService,
        ports::Filesystem,
    },
    domain::{AttributeEscaping, LibrarySelection, NONE_SELECTION, package_name_for},
    error::SeedlingError,
};

use crate::{
    cli::{NewArgs, OutputFormat},
    commands::{registry_origin, template_origin},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt,
};

/// Execute the `seedling new` command.
///
/// Dispatch sequence:
/// 1. Validate the target directory
/// 2. Locate the template and registry, build the service
/// 3. Resolve and validate the library selection
/// 4. Refuse to clobber template files unless `--force`
/// 5. Confirm with the user unless `--yes`, `--quiet` or non-interactive
/// 6. Early-exit if `--dry-run`
/// 7. Scaffold and print next steps
#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    // 1. Target
    let target = args.dir.clone();
    let project_name = validate_target(&target)?;

    // 2. Assets + service
    let template = template_origin(args.template_dir.clone(), &config);
    let registry = registry_origin(args.registry.clone(), &config);
    let Some(template_root) = template.path().map(Path::to_path_buf) else {
        return Err(CliError::InvalidInput {
            message: format!("no template directory available ({template})"),
            source: None,
        });
    };
    debug!(template = %template, registry = %registry, "assets resolved");

    let options = scaffold_options(template_root, &args, &config);
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let service = ScaffoldService::new(Arc::clone(&filesystem), open_registry(&registry), options);
    let template_root = &service.options().template_root;

    // 3. Library selection
    let selection = resolve_selection(&args, &config, &output, &service)?;
    service.validate_selection(&selection).map_err(lift)?;

    // 4. Conflicts (a no-op under --force)
    service.check_target(&target).map_err(lift)?;

    // 5. Confirm
    if !args.yes && !output.is_quiet() && prompt::is_interactive() {
        show_configuration(&output, &target, &project_name, &selection, &template, &registry)?;
        if !prompt::confirm("Create this project?")? {
            return Err(CliError::Cancelled);
        }
    }

    // 6. Dry run
    if args.dry_run {
        return print_dry_run(&output, filesystem.as_ref(), template_root, &target);
    }

    // 7. Scaffold
    if output.format() != OutputFormat::Json {
        output.header(&format!("Creating '{project_name}'..."))?;
    }
    let spinner = output.spinner("Copying template and injecting assets");
    let result = service.run_with_report(&target, &selection);
    spinner.finish_and_clear();

    let report = result.map_err(|failure| {
        warn!(phase = %failure.phase, "scaffold stopped early");
        lift(failure.into())
    })?;
    info!(files = report.tree.file_count(), "project created");

    print_report(&output, &report, &selection)
}

// ── Validation ────────────────────────────────────────────────────────────────

/// The target needs a usable final segment to derive a package name from.
fn validate_target(target: &Path) -> CliResult<String> {
    if target.as_os_str().is_empty() {
        return Err(CliError::InvalidInput {
            message: "target directory cannot be empty".into(),
            source: None,
        });
    }
    if target.file_name().is_none() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' does not name a directory", target.display()),
            source: None,
        });
    }
    if target.is_file() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is a file", target.display()),
            source: None,
        });
    }
    Ok(package_name_for(target))
}

/// Core errors the user can act on get their own CLI variant.
fn lift(err: SeedlingError) -> CliError {
    match err {
        SeedlingError::Application(ApplicationError::UnknownLibrary { id, available }) => {
            CliError::UnknownLibrary { id, available }
        }
        SeedlingError::Application(ApplicationError::TargetConflict { path, conflicts }) => {
            CliError::ProjectExists { path, conflicts }
        }
        other => CliError::Core(other),
    }
}

// ── Option resolution ─────────────────────────────────────────────────────────

fn scaffold_options(template_root: PathBuf, args: &NewArgs, config: &AppConfig) -> ScaffoldOptions {
    let policy = if args.force {
        ConflictPolicy::Overwrite
    } else {
        ConflictPolicy::Reject
    };
    let escaping = if args.escape_attributes || config.inject.escape_attributes {
        AttributeEscaping::Html
    } else {
        AttributeEscaping::Verbatim
    };

    ScaffoldOptions::new(template_root)
        .registry_ttl(config.cache.registry_ttl())
        .conflict_policy(policy)
        .escaping(escaping)
}

/// The flag, then `defaults.library`.
fn requested_library(args: &NewArgs, config: &AppConfig) -> Option<String> {
    args.library
        .clone()
        .or_else(|| config.defaults.library.clone())
}

/// Explicit choice, else a prompt when someone can answer it, else `none`.
fn resolve_selection(
    args: &NewArgs,
    config: &AppConfig,
    output: &OutputManager,
    service: &ScaffoldService,
) -> CliResult<LibrarySelection> {
    let requested = match requested_library(args, config) {
        Some(id) => Some(id),
        None if !args.yes && !output.is_quiet() && prompt::is_interactive() => {
            let registry = service.libraries()?;
            prompt::select_library(&registry)?
        }
        None => None,
    };

    let raw = requested.unwrap_or_else(|| NONE_SELECTION.to_owned());
    LibrarySelection::parse(&raw).map_err(|e| CliError::Core(e.into()))
}

// ── Template listing ──────────────────────────────────────────────────────────

fn template_files(filesystem: &dyn Filesystem, template_root: &Path) -> CliResult<Vec<PathBuf>> {
    let entries = filesystem
        .walk(template_root)
        .map_err(|e| CliError::IoError {
            message: format!("Failed to read template '{}'", template_root.display()),
            source: e,
        })?;
    Ok(entries
        .into_iter()
        .filter(|e| !e.is_dir())
        .map(|e| e.relative)
        .collect())
}

// ── Display ───────────────────────────────────────────────────────────────────

fn show_configuration(
    output: &OutputManager,
    target: &Path,
    project_name: &str,
    selection: &LibrarySelection,
    template: &AssetOrigin,
    registry: &AssetOrigin,
) -> CliResult<()> {
    output.header("Project configuration:")?;
    output.print(&format!("  Directory: {}", target.display()))?;
    output.print(&format!("  Package:   {project_name}"))?;
    output.print(&format!("  Library:   {selection}"))?;
    output.detail(&format!("  Template:  {template}"))?;
    output.detail(&format!("  Registry:  {registry}"))?;
    output.print("")?;
    Ok(())
}

#[derive(Serialize)]
struct DryRun<'a> {
    dry_run: bool,
    target: &'a Path,
    files: Vec<PathBuf>,
}

fn print_dry_run(
    output: &OutputManager,
    filesystem: &dyn Filesystem,
    template_root: &Path,
    target: &Path,
) -> CliResult<()> {
    let files = template_files(filesystem, template_root)?;

    if output.format() == OutputFormat::Json {
        output.json(&DryRun {
            dry_run: true,
            target,
            files,
        })?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would create {} files in {}",
        files.len(),
        target.display()
    ))?;
    for file in &files {
        output.detail(&format!("  {}", file.display()))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct CreatedProject<'a> {
    #[serde(flatten)]
    report: &'a ScaffoldReport,
    library: String,
    created_at: String,
}

fn print_report(
    output: &OutputManager,
    report: &ScaffoldReport,
    selection: &LibrarySelection,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(&CreatedProject {
            report,
            library: selection.to_string(),
            created_at: Utc::now().to_rfc3339(),
        })?;
        return Ok(());
    }

    let name = report.package_name.as_deref().unwrap_or("project");
    output.success(&format!("Project '{name}' created in {}", report.target.display()))?;
    for file in &report.tree.files {
        output.detail(&format!("  {}", file.display()))?;
    }

    if let Some(id) = selection.id() {
        match &report.injection.library {
            Some(_) if !report.injection.css_inserted && !report.injection.js_inserted => {
                output.warning(&format!("'{id}' added no tags to index.html"))?;
            }
            Some(_) => output.info(&format!("Injected '{id}' into index.html"))?,
            None => output.warning(&format!("'{id}' is not in the registry, nothing injected"))?,
        }
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", report.target.display()))?;
    output.print("  npm install")?;
    output.print("  npm run dev")?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    fn args(dir: &str) -> NewArgs {
        NewArgs {
            dir: PathBuf::from(dir),
            library: None,
            yes: true,
            force: false,
            dry_run: false,
            template_dir: None,
            registry: None,
            escape_attributes: false,
        }
    }

    #[test]
    fn target_name_becomes_package_name() {
        assert_eq!(validate_target(Path::new("sites/My Blog")).unwrap(), "my-blog");
    }

    #[test]
    fn empty_target_is_rejected() {
        assert!(matches!(
            validate_target(Path::new("")),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn parent_dir_target_is_rejected() {
        assert!(matches!(
            validate_target(Path::new("..")),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn file_target_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            validate_target(&file),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn flag_beats_configured_default() {
        let mut config = AppConfig::default();
        config.defaults.library = Some("bulma".into());

        let mut with_flag = args("x");
        with_flag.library = Some("htmx".into());
        assert_eq!(requested_library(&with_flag, &config).as_deref(), Some("htmx"));
        assert_eq!(requested_library(&args("x"), &config).as_deref(), Some("bulma"));
        assert_eq!(requested_library(&args("x"), &AppConfig::default()), None);
    }

    #[test]
    fn options_follow_force_and_escaping() {
        let config = AppConfig::default();
        let options = scaffold_options(PathBuf::from("/tpl"), &args("x"), &config);
        assert_eq!(options.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(options.escaping, AttributeEscaping::Verbatim);
        assert_eq!(options.registry_ttl, config.cache.registry_ttl());

        let mut forced = args("x");
        forced.force = true;
        forced.escape_attributes = true;
        let options = scaffold_options(PathBuf::from("/tpl"), &forced, &config);
        assert_eq!(options.conflict_policy, ConflictPolicy::Overwrite);
        assert_eq!(options.escaping, AttributeEscaping::Html);
    }

    #[test]
    fn configured_escaping_applies_without_flag() {
        let mut config = AppConfig::default();
        config.inject.escape_attributes = true;
        let options = scaffold_options(PathBuf::from("/tpl"), &args("x"), &config);
        assert_eq!(options.escaping, AttributeEscaping::Html);
    }

    #[test]
    fn template_files_skip_directories() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("tpl");
        fs::create_dir_all(template.join("src")).unwrap();
        fs::write(template.join("index.html"), "<html></html>").unwrap();
        fs::write(template.join("src/main.js"), "").unwrap();

        let files = template_files(&LocalFilesystem::new(), &template).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("index.html"), PathBuf::from("src/main.js")]
        );
    }

    #[test]
    fn target_conflict_becomes_project_exists() {
        let err = lift(
            ApplicationError::TargetConflict {
                path: PathBuf::from("/tmp/site"),
                conflicts: vec!["index.html".into()],
            }
            .into(),
        );
        assert!(matches!(err, CliError::ProjectExists { ref conflicts, .. } if conflicts == &vec!["index.html".to_string()]));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_library_error_is_lifted() {
        let err = lift(
            ApplicationError::UnknownLibrary {
                id: "nope".into(),
                available: vec!["bulma".into()],
            }
            .into(),
        );
        assert!(matches!(err, CliError::UnknownLibrary { ref id, .. } if id == "nope"));
        assert_eq!(err.exit_code(), 2);
    }
}
