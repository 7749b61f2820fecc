//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The CLI
//! layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `RAILSMITH_*` environment variables, `__` between section and key
//!    (`RAILSMITH_DEFAULTS__PORT=4000`); `.env` is loaded first
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Answers used when a flag is not given.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
    /// External commands the recipe runs.
    pub commands: CommandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub database: String,
    pub css: String,
    /// Pre-answers the port prompt when set.
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose files shadow the built-in templates.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Dependency install command, split on whitespace.
    pub bundle: String,
    pub skip_bundle: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            database: "sqlite".into(),
            css: "tailwind".into(),
            port: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            bundle: "bundle install".into(),
            skip_bundle: false,
        }
    }
}

impl AppConfig {
    /// Layer defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix("RAILSMITH"))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        debug!(path = %path.display(), required, "loading configuration");

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.railsmith.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "railsmith", "railsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".railsmith.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix("RAILSMITH").source(Some(HashMap::new()))
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.database, "sqlite");
        assert_eq!(cfg.defaults.css, "tailwind");
        assert_eq!(cfg.defaults.port, None);
        assert_eq!(cfg.commands.bundle, "bundle install");
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false, no_env()).unwrap();
        assert_eq!(cfg.defaults.database, "sqlite");
        assert_eq!(cfg.defaults.port, None);
    }

    #[test]
    fn missing_required_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml"), true, no_env()).is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nport = 4000\ndatabase = \"postgresql\"\n").unwrap();

        let cfg = AppConfig::load_from(&path, true, no_env()).unwrap();
        assert_eq!(cfg.defaults.port, Some(4000));
        assert_eq!(cfg.defaults.database, "postgresql");
        assert_eq!(cfg.defaults.css, "tailwind");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nport = 4000\n").unwrap();

        let env = Environment::with_prefix("RAILSMITH").source(Some(HashMap::from([
            ("RAILSMITH_DEFAULTS__PORT".to_string(), "5000".to_string()),
            ("RAILSMITH_COMMANDS__SKIP_BUNDLE".to_string(), "true".to_string()),
        ])));
        let cfg = AppConfig::load_from(&path, true, env).unwrap();
        assert_eq!(cfg.defaults.port, Some(5000));
        assert!(cfg.commands.skip_bundle);
    }

    #[test]
    fn round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[commands]"));
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.defaults.css, "tailwind");
        assert_eq!(back.defaults.port, None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
