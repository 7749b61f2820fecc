//! CLI argument definitions using the clap derive API.
//!
//! The only place that knows argument names, aliases, help text and value
//! enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use railsmith_core::domain::{CssFramework, Database};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "railsmith",
    bin_name = "railsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Opinionated setup for a freshly generated Rails application",
    long_about = "railsmith adds gems, configuration, background jobs and \
                  styling to an application created with `rails new`. \
                  Run it once, from anywhere, against the new directory.",
    after_help = "EXAMPLES:\n\
        \x20 railsmith apply ./blog --database sqlite --css tailwind --port 4000\n\
        \x20 railsmith apply ./shop --database postgresql --css other --yes\n\
        \x20 railsmith apply ./blog --dry-run\n\
        \x20 railsmith completions bash > /usr/share/bash-completion/completions/railsmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configure a generated Rails application in place.
    #[command(
        visible_alias = "a",
        about = "Configure a generated Rails application",
        after_help = "EXAMPLES:\n\
            \x20 railsmith apply ./blog\n\
            \x20 railsmith apply ./blog --database sqlite --css tailwind --port 4000\n\
            \x20 railsmith apply ./blog --skip-bundle --yes"
    )]
    Apply(ApplyArgs),

    /// List the templates the recipe copies.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 railsmith templates\n\
            \x20 railsmith templates --format json"
    )]
    Templates(TemplatesArgs),

    #[command(
        about = "Write a default configuration file",
        after_help = "EXAMPLES:\n\
            \x20 railsmith init\n\
            \x20 railsmith init --force"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 railsmith completions bash > ~/.local/share/bash-completion/completions/railsmith\n\
            \x20 railsmith completions zsh  > ~/.zfunc/_railsmith\n\
            \x20 railsmith completions fish > ~/.config/fish/completions/railsmith.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect the configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 railsmith config get defaults.port\n\
            \x20 railsmith config list\n\
            \x20 railsmith config path"
    )]
    Config(ConfigCommands),
}

// ── apply ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Root of the application created by `rails new`.
    #[arg(value_name = "APP_DIR", help = "Application directory")]
    pub app_dir: PathBuf,

    /// Database the application was generated with.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "DATABASE",
        value_enum,
        help = "Database (default from config: sqlite)"
    )]
    pub database: Option<DatabaseArg>,

    #[arg(
        long = "css",
        value_name = "CSS",
        value_enum,
        help = "CSS framework (default from config: tailwind)"
    )]
    pub css: Option<CssArg>,

    /// Development server port. Skips the prompt.
    #[arg(short = 'p', long = "port", value_name = "PORT", help = "Development server port")]
    pub port: Option<String>,

    #[arg(short = 'y', long = "yes", help = "Accept defaults without prompting")]
    pub yes: bool,

    #[arg(long = "skip-bundle", help = "Do not run the dependency install step")]
    pub skip_bundle: bool,

    #[arg(long = "dry-run", help = "Print the steps without running them")]
    pub dry_run: bool,

    /// Run even when the application was already configured.
    #[arg(long = "force", help = "Run again over an already configured application")]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DatabaseArg {
    #[value(alias = "sqlite3")]
    Sqlite,
    #[value(alias = "postgres", alias = "pg")]
    Postgresql,
    /// Any other adapter; treated like PostgreSQL.
    Other,
}

impl From<DatabaseArg> for Database {
    fn from(arg: DatabaseArg) -> Self {
        match arg {
            DatabaseArg::Sqlite => Self::Sqlite,
            DatabaseArg::Postgresql => Self::Postgresql,
            DatabaseArg::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum CssArg {
    Tailwind,
    /// Any other choice; no stylesheet changes.
    Other,
}

impl From<CssArg> for CssFramework {
    fn from(arg: CssArg) -> Self {
        match arg {
            CssArg::Tailwind => Self::Tailwind,
            CssArg::Other => Self::Other,
        }
    }
}

// ── templates ─────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.port`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
