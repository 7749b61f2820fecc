//! The `Configuration` record and its typestate builder.
//!
//! A `Configuration` holds every generation-time choice. It is built once at
//! start-up and passed by reference to everything that needs it; nothing
//! mutates it afterwards.
//!
//! # Typestate builder
//!
//! The builder uses two phantom markers (`NoAppName` / `HasAppName`) so that
//! `build()` only exists once the application name is known. Everything else
//! has a default.

use std::fmt;
use std::marker::PhantomData;

use crate::domain::{
    error::DomainError,
    value_objects::{CssFramework, Database, Port},
};

pub const DEFAULT_RUBY_VERSION: &str = "3.3.0";
pub const DEFAULT_RAILS_VERSION: &str = "7.1.0";

// ── Aggregate ────────────────────────────────────────────────────────────────

/// Immutable generation-time choices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    app_name: String,
    database: Database,
    css_framework: CssFramework,
    port: Port,
    ruby_version: String,
    rails_version: String,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder<NoAppName> {
        ConfigurationBuilder::new()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub const fn database(&self) -> Database {
        self.database
    }
    pub const fn css_framework(&self) -> CssFramework {
        self.css_framework
    }
    pub const fn port(&self) -> Port {
        self.port
    }
    pub fn ruby_version(&self) -> &str {
        &self.ruby_version
    }
    pub fn rails_version(&self) -> &str {
        &self.rails_version
    }

    pub const fn uses_tailwind(&self) -> bool {
        matches!(self.css_framework, CssFramework::Tailwind)
    }

    pub const fn uses_sqlite(&self) -> bool {
        matches!(self.database, Database::Sqlite)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} + {}, port {})",
            self.app_name, self.database, self.css_framework, self.port
        )
    }
}

// ── Typestate markers ────────────────────────────────────────────────────────

/// Marker: application name not yet set.
pub struct NoAppName;
/// Marker: application name set; the builder can now `build()`.
pub struct HasAppName;

// ── Builder ──────────────────────────────────────────────────────────────────

pub struct ConfigurationBuilder<S> {
    app_name: Option<String>,
    database: Database,
    css_framework: CssFramework,
    port: Port,
    ruby_version: Option<String>,
    rails_version: Option<String>,
    _marker: PhantomData<S>,
}

impl ConfigurationBuilder<NoAppName> {
    pub fn new() -> Self {
        Self {
            app_name: None,
            database: Database::default(),
            css_framework: CssFramework::default(),
            port: Port::DEFAULT,
            ruby_version: None,
            rails_version: None,
            _marker: PhantomData,
        }
    }

    /// Set the application name, usually the application directory name.
    pub fn app_name(self, name: impl Into<String>) -> ConfigurationBuilder<HasAppName> {
        ConfigurationBuilder {
            app_name: Some(name.into()),
            database: self.database,
            css_framework: self.css_framework,
            port: self.port,
            ruby_version: self.ruby_version,
            rails_version: self.rails_version,
            _marker: PhantomData,
        }
    }
}

impl Default for ConfigurationBuilder<NoAppName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ConfigurationBuilder<S> {
    pub fn database(mut self, database: Database) -> Self {
        self.database = database;
        self
    }

    pub fn css_framework(mut self, css: CssFramework) -> Self {
        self.css_framework = css;
        self
    }

    pub fn port(mut self, port: Port) -> Self {
        self.port = port;
        self
    }

    pub fn ruby_version(mut self, version: impl Into<String>) -> Self {
        self.ruby_version = Some(version.into());
        self
    }

    pub fn rails_version(mut self, version: impl Into<String>) -> Self {
        self.rails_version = Some(version.into());
        self
    }
}

impl ConfigurationBuilder<HasAppName> {
    /// Validate and produce the record.
    ///
    /// The application name must be non-empty and made of ASCII letters,
    /// digits, `_` or `-`, and must start with a letter.
    pub fn build(self) -> Result<Configuration, DomainError> {
        let app_name = self
            .app_name
            .ok_or(DomainError::MissingRequiredField { field: "app_name" })?;
        validate_app_name(&app_name)?;

        Ok(Configuration {
            app_name,
            database: self.database,
            css_framework: self.css_framework,
            port: self.port,
            ruby_version: non_blank(self.ruby_version, DEFAULT_RUBY_VERSION),
            rails_version: non_blank(self.rails_version, DEFAULT_RAILS_VERSION),
        })
    }
}

fn validate_app_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingRequiredField { field: "app_name" });
    }
    if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidConfiguration(format!(
            "application name '{name}' must start with a letter"
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(DomainError::InvalidConfiguration(format!(
            "application name '{name}' contains invalid character '{bad}'"
        )));
    }
    if trimmed != name {
        return Err(DomainError::InvalidConfiguration(format!(
            "application name '{name}' has surrounding whitespace"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}
