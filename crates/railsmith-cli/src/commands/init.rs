//! `railsmith init`: write a default configuration file.

use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = AppConfig::config_path();

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    write_default(&config_path)?;
    info!(path = %config_path.display(), "configuration written");
    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    Ok(())
}

fn write_default(path: &Path) -> CliResult<()> {
    let body = toml::to_string_pretty(&AppConfig::default())
        .with_cli_context(|| "Failed to serialise default config")?;
    let text = format!(
        "# railsmith configuration, generated {}\n\
         # Environment variables override these values, e.g. RAILSMITH_DEFAULTS__PORT=4000.\n\
         # Set defaults.port to skip the port prompt.\n\n{body}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, text)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_default(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# railsmith configuration, generated "));

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.database, "sqlite");
        assert_eq!(cfg.commands.bundle, "bundle install");
    }
}
