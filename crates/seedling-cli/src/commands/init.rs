//! `seedling init`: create a default configuration file.

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, write_file},
    error::CliResult,
    output::OutputManager,
};

/// Write the default configuration to `--config` or the standard location.
pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    let config_path = AppConfig::target_path(global.config.as_ref());

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    write_file(&config_path, &AppConfig::default().to_toml()?)?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;

    Ok(())
}
