//! HTML asset injection into a materialized entry file.

use std::{io, path::Path, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{AttributeEscaping, InjectionOutcome, LibraryDefinition, splice},
    error::{SeedlingError, SeedlingResult},
};

/// Rewrites an HTML file in place to include a library's asset tags.
pub struct HtmlInjector {
    filesystem: Arc<dyn Filesystem>,
    escaping: AttributeEscaping,
}

impl HtmlInjector {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            escaping: AttributeEscaping::default(),
        }
    }

    pub fn with_escaping(mut self, escaping: AttributeEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Splice `definition`'s tags into the file at `html_path`.
    ///
    /// With no definition the file is not touched at all. Otherwise the file
    /// is read, spliced and fully rewritten; no backup is kept. Calling this
    /// twice with the same library inserts the blocks twice.
    #[instrument(skip_all, fields(path = %html_path.display(), library = definition.map(|d| d.id.as_str())))]
    pub fn inject(
        &self,
        html_path: &Path,
        definition: Option<&LibraryDefinition>,
    ) -> SeedlingResult<InjectionOutcome> {
        let Some(definition) = definition else {
            info!("no library selected, skipping injection");
            return Ok(InjectionOutcome::skipped());
        };

        let html = self
            .filesystem
            .read_to_string(html_path)
            .map_err(|e| io_error(html_path, "read", e))?;

        let spliced = splice(&html, definition, self.escaping);
        for marker in &spliced.missing_markers {
            warn!(marker, "closing marker not found, block not inserted");
        }

        self.filesystem
            .write_file(html_path, &spliced.html)
            .map_err(|e| io_error(html_path, "write", e))?;

        info!(
            css = spliced.outcome.css_inserted,
            js = spliced.outcome.js_inserted,
            "assets injected"
        );
        Ok(spliced.outcome)
    }
}

fn io_error(path: &Path, operation: &str, e: io::Error) -> SeedlingError {
    ApplicationError::InjectionIo {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
