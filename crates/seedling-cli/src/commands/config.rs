//! `seedling config`: read and write configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, set_value},
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            output.print(&render_value(&value))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::target_path(global.config.as_ref());
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(config.to_toml()?.trim_end())?;
        }

        ConfigCommands::Path => {
            let path = AppConfig::target_path(global.config.as_ref());
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

/// Strings print bare, unset values print as an empty line.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_render_without_quotes() {
        assert_eq!(render_value(&json!("bulma")), "bulma");
    }

    #[test]
    fn unset_renders_empty() {
        assert_eq!(render_value(&serde_json::Value::Null), "");
    }

    #[test]
    fn scalars_render_as_json() {
        assert_eq!(render_value(&json!(3600)), "3600");
        assert_eq!(render_value(&json!(false)), "false");
    }

    #[test]
    fn default_lookup_renders() {
        let cfg = AppConfig::default();
        assert_eq!(render_value(&cfg.get("output.format").unwrap()), "auto");
        assert_eq!(render_value(&cfg.get("defaults.library").unwrap()), "");
    }
}
