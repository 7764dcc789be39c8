//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Materialize the template into the target directory
//! 2. Customize the package descriptor
//! 3. Load the library registry (cache-backed)
//! 4. Inject the selected library's assets into the entry HTML file
//!
//! Phases run strictly in order. The first failure stops the run; nothing is
//! retried or rolled back. The registry cache is cleared once when the run
//! ends, whichever way it ends.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        cache::{DEFAULT_TTL, RegistryCache},
        ports::{Filesystem, RegistrySource},
        services::{
            ConflictPolicy, HtmlInjector, LibraryRegistryLoader, MaterializedTree,
            TemplateMaterializer,
        },
    },
    domain::{
        AttributeEscaping, InjectionOutcome, LibrarySelection, Registry, customize_package_json,
        package_name_for,
    },
    error::{SeedlingError, SeedlingResult},
};

/// Knobs for a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Root of the template tree to copy.
    pub template_root: PathBuf,
    /// Entry HTML file, relative to the target.
    pub entry_html: PathBuf,
    /// Package descriptor to rename, relative to the target.
    pub descriptor: Option<PathBuf>,
    pub registry_ttl: Duration,
    pub conflict_policy: ConflictPolicy,
    pub escaping: AttributeEscaping,
}

impl ScaffoldOptions {
    pub fn new(template_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            entry_html: PathBuf::from("index.html"),
            descriptor: Some(PathBuf::from("package.json")),
            registry_ttl: DEFAULT_TTL,
            conflict_policy: ConflictPolicy::default(),
            escaping: AttributeEscaping::default(),
        }
    }

    pub fn entry_html(mut self, relative: impl Into<PathBuf>) -> Self {
        self.entry_html = relative.into();
        self
    }

    pub fn descriptor(mut self, relative: Option<PathBuf>) -> Self {
        self.descriptor = relative;
        self
    }

    pub fn registry_ttl(mut self, ttl: Duration) -> Self {
        self.registry_ttl = ttl;
        self
    }

    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn escaping(mut self, escaping: AttributeEscaping) -> Self {
        self.escaping = escaping;
        self
    }
}

/// The steps of a scaffold run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaffoldPhase {
    Materialize,
    Describe,
    LoadRegistry,
    Inject,
}

impl fmt::Display for ScaffoldPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Materialize => "materialize",
            Self::Describe => "describe",
            Self::LoadRegistry => "load-registry",
            Self::Inject => "inject",
        };
        f.write_str(name)
    }
}

/// A run that stopped at `phase`.
///
/// Everything done by earlier phases is still on disk.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{phase} phase failed: {error}")]
pub struct PhaseFailure {
    pub phase: ScaffoldPhase,
    #[source]
    pub error: SeedlingError,
}

impl From<PhaseFailure> for SeedlingError {
    fn from(failure: PhaseFailure) -> Self {
        failure.error
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaffoldReport {
    pub target: PathBuf,
    pub tree: MaterializedTree,
    /// Package name written into the descriptor, if one was present.
    pub package_name: Option<String>,
    pub injection: InjectionOutcome,
}

/// Clears the cache when dropped, so every exit path releases it exactly once.
struct ClearOnDrop<'a>(&'a RegistryCache<Registry>);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    materializer: TemplateMaterializer,
    loader: LibraryRegistryLoader,
    injector: HtmlInjector,
    cache: Arc<RegistryCache<Registry>>,
    options: ScaffoldOptions,
}

impl ScaffoldService {
    /// Create a service with its own registry cache.
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        registry: Box<dyn RegistrySource>,
        options: ScaffoldOptions,
    ) -> Self {
        Self::with_cache(filesystem, registry, Arc::default(), options)
    }

    /// Create a service around an existing cache (tests, embedding hosts).
    pub fn with_cache(
        filesystem: Arc<dyn Filesystem>,
        registry: Box<dyn RegistrySource>,
        cache: Arc<RegistryCache<Registry>>,
        options: ScaffoldOptions,
    ) -> Self {
        let materializer =
            TemplateMaterializer::new(Arc::clone(&filesystem), options.template_root.clone())
                .with_policy(options.conflict_policy);
        let loader = LibraryRegistryLoader::new(registry, Arc::clone(&cache))
            .with_ttl(options.registry_ttl);
        let injector = HtmlInjector::new(Arc::clone(&filesystem)).with_escaping(options.escaping);

        Self {
            filesystem,
            materializer,
            loader,
            injector,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &ScaffoldOptions {
        &self.options
    }

    /// Run the materializer's conflict check on its own, before any write.
    ///
    /// Only the `Reject` policy can fail here. A run under that policy makes
    /// the same check again.
    pub fn check_target(&self, target: &Path) -> SeedlingResult<()> {
        self.materializer.check_target(target)
    }

    /// Scaffold a project and return the target directory.
    ///
    /// Errors are the originating phase's error, unchanged.
    pub fn run(&self, target: &Path, selection: &LibrarySelection) -> SeedlingResult<PathBuf> {
        self.run_with_report(target, selection)
            .map(|report| report.target)
            .map_err(|failure| failure.error)
    }

    /// Scaffold a project, reporting which phase failed if it does not finish.
    #[instrument(
        skip_all,
        fields(
            run_id = %Uuid::new_v4(),
            target = %target.display(),
            library = %selection
        )
    )]
    pub fn run_with_report(
        &self,
        target: &Path,
        selection: &LibrarySelection,
    ) -> Result<ScaffoldReport, PhaseFailure> {
        let _release = ClearOnDrop(&self.cache);
        info!("Scaffold started");

        let tree = self
            .materializer
            .materialize(target)
            .map_err(at(ScaffoldPhase::Materialize))?;

        let package_name = self
            .customize_descriptor(target, &tree)
            .map_err(at(ScaffoldPhase::Describe))?;

        let registry = self.loader.load().map_err(at(ScaffoldPhase::LoadRegistry))?;

        let definition = registry.resolve(selection);
        if let (Some(id), None) = (selection.id(), definition) {
            warn!(library = %id, "library not in registry, nothing will be injected");
        }

        let html_path = target.join(&self.options.entry_html);
        let injection = self
            .injector
            .inject(&html_path, definition)
            .map_err(at(ScaffoldPhase::Inject))?;

        info!("Scaffold completed successfully");
        Ok(ScaffoldReport {
            target: target.to_path_buf(),
            tree,
            package_name,
            injection,
        })
    }

    /// Load the registry for listing or validation.
    ///
    /// The result stays cached so a following [`Self::run_with_report`]
    /// reuses it; that run clears the cache when it ends.
    pub fn libraries(&self) -> SeedlingResult<Arc<Registry>> {
        self.loader.load()
    }

    /// Check a selection against the registry before scaffolding.
    pub fn validate_selection(&self, selection: &LibrarySelection) -> SeedlingResult<()> {
        let Some(id) = selection.id() else {
            return Ok(());
        };
        let registry = self.libraries()?;
        if registry.contains(id.as_str()) {
            return Ok(());
        }
        Err(ApplicationError::UnknownLibrary {
            id: id.to_string(),
            available: registry.ids().map(ToString::to_string).collect(),
        }
        .into())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Rename the package in the materialized descriptor, if the template has one.
    fn customize_descriptor(
        &self,
        target: &Path,
        tree: &MaterializedTree,
    ) -> SeedlingResult<Option<String>> {
        let Some(relative) = &self.options.descriptor else {
            return Ok(None);
        };
        if !tree.contains_file(relative) {
            return Ok(None);
        }

        let path = target.join(relative);
        let descriptor_error = |reason: String| ApplicationError::Descriptor {
            path: path.clone(),
            reason,
        };

        let text = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| descriptor_error(format!("Failed to read: {e}")))?;
        let name = package_name_for(target);
        let updated =
            customize_package_json(&text, &name).map_err(|e| descriptor_error(e.to_string()))?;
        self.filesystem
            .write_file(&path, &updated)
            .map_err(|e| descriptor_error(format!("Failed to write: {e}")))?;

        info!(package = %name, "package descriptor customized");
        Ok(Some(name))
    }
}

fn at(phase: ScaffoldPhase) -> impl FnOnce(SeedlingError) -> PhaseFailure {
    move |error| PhaseFailure { phase, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ports::MockRegistrySource, services::test_support::StubFilesystem};
    use crate::domain::{AssetTag, LibraryDefinition, LibraryId};

    const PAGE: &str = "<html>\n<head>\n</head>\n<body>\n</body>\n</html>\n";
    const PACKAGE: &str = "{\n  \"name\": \"template\",\n  \"version\": \"0.0.0\"\n}\n";

    fn template_fs() -> Arc<StubFilesystem> {
        let fs = StubFilesystem::new();
        fs.add_file("/tpl/index.html", PAGE);
        fs.add_file("/tpl/package.json", PACKAGE);
        Arc::new(fs)
    }

    fn alpha_registry() -> Registry {
        Registry::new().with_library(
            LibraryDefinition::new(LibraryId::new("alpha").unwrap())
                .with_css(AssetTag::new("a.css"))
                .with_js(AssetTag::new("a.js").defer(true)),
        )
    }

    fn source_returning(registry: Registry) -> Box<MockRegistrySource> {
        let mut source = MockRegistrySource::new();
        source.expect_describe().return_const("mock".to_string());
        source
            .expect_fetch()
            .returning(move || Ok(registry.clone()));
        Box::new(source)
    }

    fn service(fs: Arc<StubFilesystem>, source: Box<MockRegistrySource>) -> ScaffoldService {
        ScaffoldService::new(fs, source, ScaffoldOptions::new("/tpl"))
    }

    #[test]
    fn run_materializes_renames_and_injects() {
        let fs = template_fs();
        let svc = service(fs.clone(), source_returning(alpha_registry()));

        let selection = LibrarySelection::parse("alpha").unwrap();
        let report = svc.run_with_report(Path::new("/out/my-site"), &selection).unwrap();

        let html = fs.read("/out/my-site/index.html").unwrap();
        assert!(html.contains("  <link rel=\"stylesheet\" href=\"a.css\">\n</head>"));
        assert!(html.contains("  <script src=\"a.js\" defer></script>\n</body>"));

        let package = fs.read("/out/my-site/package.json").unwrap();
        assert!(package.contains("\"name\": \"my-site\""));
        assert_eq!(report.package_name.as_deref(), Some("my-site"));
        assert_eq!(report.target, PathBuf::from("/out/my-site"));
        assert!(report.injection.changed());
    }

    #[test]
    fn run_returns_target_dir() {
        let fs = template_fs();
        let svc = service(fs, source_returning(alpha_registry()));
        let target = svc.run(Path::new("/out/x"), &LibrarySelection::None).unwrap();
        assert_eq!(target, PathBuf::from("/out/x"));
    }

    #[test]
    fn sentinel_leaves_html_byte_identical() {
        let fs = template_fs();
        let svc = service(fs.clone(), source_returning(alpha_registry()));
        svc.run(Path::new("/out/x"), &LibrarySelection::None).unwrap();
        assert_eq!(fs.read("/out/x/index.html").as_deref(), Some(PAGE));
    }

    #[test]
    fn unknown_library_injects_nothing() {
        let fs = template_fs();
        let svc = service(fs.clone(), source_returning(alpha_registry()));
        let selection = LibrarySelection::parse("gamma").unwrap();
        let report = svc.run_with_report(Path::new("/out/x"), &selection).unwrap();
        assert!(!report.injection.changed());
        assert_eq!(fs.read("/out/x/index.html").as_deref(), Some(PAGE));
    }

    #[test]
    fn registry_failure_reports_phase_and_keeps_materialized_files() {
        let fs = template_fs();
        let mut source = MockRegistrySource::new();
        source.expect_describe().return_const("bad.json".to_string());
        source.expect_fetch().returning(|| {
            Err(ApplicationError::RegistryLoad {
                origin: "bad.json".into(),
                reason: "EOF while parsing an object".into(),
            }
            .into())
        });
        let cache = Arc::new(RegistryCache::new());
        let svc = ScaffoldService::with_cache(
            fs.clone(),
            Box::new(source),
            Arc::clone(&cache),
            ScaffoldOptions::new("/tpl"),
        );

        let failure = svc
            .run_with_report(Path::new("/out/x"), &LibrarySelection::parse("alpha").unwrap())
            .unwrap_err();

        assert_eq!(failure.phase, ScaffoldPhase::LoadRegistry);
        assert!(failure.error.to_string().contains("EOF while parsing"));
        assert_eq!(fs.read("/out/x/index.html").as_deref(), Some(PAGE));
        assert!(cache.is_empty());
    }

    #[test]
    fn materialize_failure_stops_before_registry() {
        let fs = Arc::new(StubFilesystem::new());
        let mut source = MockRegistrySource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_fetch().never();
        let svc = ScaffoldService::new(fs, Box::new(source), ScaffoldOptions::new("/missing"));

        let failure = svc
            .run_with_report(Path::new("/out/x"), &LibrarySelection::None)
            .unwrap_err();
        assert_eq!(failure.phase, ScaffoldPhase::Materialize);
    }

    #[test]
    fn run_error_is_the_originating_error() {
        let fs = Arc::new(StubFilesystem::new());
        let svc = service(fs, source_returning(alpha_registry()));
        let err = svc.run(Path::new("/out/x"), &LibrarySelection::None).unwrap_err();
        assert!(matches!(
            err,
            SeedlingError::Application(ApplicationError::Materialize { .. })
        ));
    }

    #[test]
    fn invalid_descriptor_fails_describe_phase() {
        let fs = StubFilesystem::new();
        fs.add_file("/tpl/index.html", PAGE);
        fs.add_file("/tpl/package.json", "[]");
        let svc = service(Arc::new(fs), source_returning(alpha_registry()));

        let failure = svc
            .run_with_report(Path::new("/out/x"), &LibrarySelection::None)
            .unwrap_err();
        assert_eq!(failure.phase, ScaffoldPhase::Describe);
    }

    #[test]
    fn template_without_descriptor_skips_describe() {
        let fs = StubFilesystem::new();
        fs.add_file("/tpl/index.html", PAGE);
        let svc = service(Arc::new(fs), source_returning(alpha_registry()));
        let report = svc
            .run_with_report(Path::new("/out/x"), &LibrarySelection::None)
            .unwrap();
        assert!(report.package_name.is_none());
    }

    #[test]
    fn cache_is_cleared_after_success() {
        let fs = template_fs();
        let cache = Arc::new(RegistryCache::new());
        let svc = ScaffoldService::with_cache(
            fs,
            source_returning(alpha_registry()),
            Arc::clone(&cache),
            ScaffoldOptions::new("/tpl"),
        );
        svc.run(Path::new("/out/x"), &LibrarySelection::None).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn each_run_reloads_the_registry() {
        let fs = template_fs();
        let mut source = MockRegistrySource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_fetch().times(2).returning(|| Ok(alpha_registry()));
        let svc = ScaffoldService::new(fs, Box::new(source), ScaffoldOptions::new("/tpl"));

        svc.run(Path::new("/out/a"), &LibrarySelection::None).unwrap();
        svc.run(Path::new("/out/b"), &LibrarySelection::None).unwrap();
    }

    #[test]
    fn pick_validate_and_run_fetch_the_registry_once() {
        let fs = template_fs();
        let mut source = MockRegistrySource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_fetch().times(1).returning(|| Ok(alpha_registry()));
        let cache = Arc::new(RegistryCache::new());
        let svc = ScaffoldService::with_cache(
            fs,
            Box::new(source),
            Arc::clone(&cache),
            ScaffoldOptions::new("/tpl"),
        );

        let selection = LibrarySelection::parse("alpha").unwrap();
        assert!(svc.libraries().unwrap().contains("alpha"));
        svc.validate_selection(&selection).unwrap();
        let report = svc.run_with_report(Path::new("/out/x"), &selection).unwrap();

        assert!(report.injection.changed());
        assert!(cache.is_empty());
    }

    #[test]
    fn validate_selection_rejects_unknown_ids() {
        let fs = template_fs();
        let svc = service(fs, source_returning(alpha_registry()));

        assert!(svc.validate_selection(&LibrarySelection::None).is_ok());
        assert!(svc
            .validate_selection(&LibrarySelection::parse("alpha").unwrap())
            .is_ok());

        let err = svc
            .validate_selection(&LibrarySelection::parse("gamma").unwrap())
            .unwrap_err();
        match err {
            SeedlingError::Application(ApplicationError::UnknownLibrary { id, available }) => {
                assert_eq!(id, "gamma");
                assert_eq!(available, vec!["alpha".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn phase_failure_display_names_phase() {
        let failure = PhaseFailure {
            phase: ScaffoldPhase::Inject,
            error: ApplicationError::CacheLock.into(),
        };
        assert!(failure.to_string().starts_with("inject phase failed"));
    }
}
