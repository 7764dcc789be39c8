//! Implementation of the `seedling list` command.

use std::sync::Arc;

use seedling_adapters::open_registry;
use seedling_core::{
    application::{LibraryRegistryLoader, RegistryCache},
    domain::{LibraryDefinition, Registry},
};
use tracing::debug;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::registry_origin,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let origin = registry_origin(args.registry, &config);
    debug!(origin = %origin, "listing libraries");

    let loader = LibraryRegistryLoader::new(open_registry(&origin), Arc::new(RegistryCache::new()));
    let registry = loader.load()?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Available libraries ({origin}):"))?;
            for line in table_lines(&registry) {
                output.print(&line)?;
            }
            output.detail("Use `seedling new <DIR> --library <ID>` to include one.")?;
        }
        ListFormat::Json => {
            let libraries: Vec<&LibraryDefinition> = registry.iter().collect();
            output.json(&libraries)?;
        }
        ListFormat::List => {
            for id in registry.ids() {
                println!("{id}");
            }
        }
    }

    Ok(())
}

/// One row per library: id, label and asset counts.
fn table_lines(registry: &Registry) -> Vec<String> {
    let width = registry.ids().map(|id| id.as_str().len()).max().unwrap_or(0);
    registry
        .iter()
        .map(|def| {
            let mut line = format!("  {:<width$}  {}", def.id.as_str(), def.label());
            if let Some(description) = &def.description {
                line.push_str(&format!(" - {description}"));
            }
            line.push_str(&format!(" [{} css, {} js]", def.css.len(), def.js.len()));
            line
        })
        .collect()
}
