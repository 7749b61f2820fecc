//! `railsmith config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&get_config_value(&config, &key)?)?;
        }
        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let text =
                toml::to_string_pretty(&config).with_cli_context(|| "Failed to serialise config")?;
            output.print(&text)?;
        }
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "defaults.database" => config.defaults.database.clone(),
        "defaults.css" => config.defaults.css.clone(),
        "defaults.port" => config
            .defaults
            .port
            .map(|p| p.to_string())
            .unwrap_or_default(),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => config.output.format.clone(),
        "templates.local_path" => config
            .templates
            .local_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        "commands.bundle" => config.commands.bundle.clone(),
        "commands.skip_bundle" => config.commands.skip_bundle.to_string(),
        _ => {
            return Err(CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            });
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let mut cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.database").unwrap(), "sqlite");
        assert_eq!(get_config_value(&cfg, "defaults.port").unwrap(), "");
        assert_eq!(get_config_value(&cfg, "commands.skip_bundle").unwrap(), "false");

        cfg.defaults.port = Some(4000);
        assert_eq!(get_config_value(&cfg, "defaults.port").unwrap(), "4000");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let err = get_config_value(&AppConfig::default(), "defaults.lang").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
