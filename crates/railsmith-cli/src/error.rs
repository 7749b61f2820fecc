//! Error handling for the railsmith CLI.
//!
//! Structured errors with user-friendly messages, actionable suggestions,
//! error chaining and exit code mapping.

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use railsmith_core::{application::ApplicationError, domain::DomainError, error::RailsmithError};

pub use railsmith_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The application directory is missing or not a directory.
    #[error("No application directory at {path}")]
    AppDirNotFound { path: PathBuf },

    /// The directory exists but does not look like a Rails application.
    #[error("{path} does not look like a Rails application (no {missing})")]
    NotARailsApp { path: PathBuf, missing: &'static str },

    // ── Config errors ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// Propagated from `railsmith-core`; suggestions come from its category.
    #[error(transparent)]
    Core(#[from] RailsmithError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

impl From<ApplicationError> for CliError {
    fn from(err: ApplicationError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run with --help to see accepted values".into()],

            Self::AppDirNotFound { path } => vec![
                format!("Create the application first: rails new {}", path.display()),
                "Then run railsmith apply against that directory".into(),
            ],

            Self::NotARailsApp { missing, .. } => vec![
                format!("Expected to find {missing}"),
                "Point railsmith at the directory created by `rails new`".into(),
            ],

            Self::ConfigError { .. } => vec![
                format!(
                    "Inspect {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Regenerate it with 'railsmith init --force'".into(),
            ],

            Self::Core(core) => core.suggestions(),

            Self::IoError { .. } => vec!["Check that the directory is writable".into()],

            Self::Cancelled => vec!["Nothing was written".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::NotARailsApp { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::AppDirNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Compatibility => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Process exit status: 2 user error, 3 not found, 4 configuration,
    /// 1 everything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
        }
    }

    /// Step at which a generation run stopped.
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Self::Core(core) => core.failed_step(),
            _ => None,
        }
    }

    /// Render the error for stderr, with ANSI styling when `styled`.
    ///
    /// The cause chain is only listed when `verbose`.
    pub fn report(&self, verbose: bool, styled: bool) -> String {
        let paint = |text: &str, style: Style| -> String {
            if !styled {
                return text.to_string();
            }
            match style {
                Style::Heading => text.red().bold().to_string(),
                Style::Message => text.red().to_string(),
                Style::Hint => text.yellow().bold().to_string(),
                Style::Muted => text.dimmed().to_string(),
            }
        };

        let mut lines = vec![
            String::new(),
            format!("{} {}", paint("error:", Style::Heading), paint(&self.to_string(), Style::Message)),
        ];

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                lines.push(paint(&format!("  caused by: {err}"), Style::Muted));
                cause = err.source();
            }
        }

        let hints = self.suggestions();
        if !hints.is_empty() {
            lines.push(String::new());
            lines.push(paint("hint:", Style::Hint));
            lines.extend(hints.iter().map(|h| format!("  {h}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint("Re-run with -v to see the cause chain.", Style::Muted));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Emit a tracing event at a severity matching the category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, error = %self, "command rejected");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, error = %self, "command failed");
            }
        }

        if let Some(step) = self.failed_step() {
            tracing::error!(step, "run stopped");
        }
        if let Some(cause) = self.source() {
            tracing::debug!(%cause, "underlying error");
        }
    }
}

#[derive(Clone, Copy)]
enum Style {
    Heading,
    Message,
    Hint,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Convert foreign errors into [`CliError`] at call-sites with a context
/// message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, toml::ser::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::ConfigError {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn app_dir_not_found_suggests_rails_new() {
        let err = CliError::AppDirNotFound {
            path: PathBuf::from("blog"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("rails new blog")));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn already_applied_is_user_error() {
        let err = CliError::from(RailsmithError::from(ApplicationError::AlreadyApplied {
            path: PathBuf::from("/app/.railsmith-applied"),
        }));
        assert_eq!(err.exit_code(), 2);
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn failed_command_reports_step() {
        let err = CliError::from(RailsmithError::from(ApplicationError::StepFailed {
            index: 12,
            step: "run bundle install".into(),
            source: Box::new(
                ApplicationError::ExternalCommandFailed {
                    command: "bundle install".into(),
                    exit_code: 5,
                }
                .into(),
            ),
        }));
        assert_eq!(err.failed_step(), Some(12));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("Step 12"));
    }

    #[test]
    fn skeleton_mismatch_exit_codes() {
        let anchor = CliError::from(RailsmithError::from(DomainError::AnchorNotFound {
            path: "config/routes.rb".into(),
            anchor: "\"end\"".into(),
        }));
        let file = CliError::from(RailsmithError::from(DomainError::FileNotFound {
            path: "Gemfile".into(),
        }));
        assert_eq!(anchor.exit_code(), 2);
        assert_eq!(file.exit_code(), 3);
    }

    #[test]
    fn plain_report_lists_hints() {
        let err = CliError::AppDirNotFound {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.report(false, false);
        assert!(s.contains("error: No application directory at /tmp/x"));
        assert!(s.contains("hint:"));
        assert!(s.contains("-v"));
        assert!(!s.contains('\u{1b}'));
    }

    #[test]
    fn verbose_report_shows_causes() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.report(true, false);
        assert!(s.contains("caused by: disk full"));
        assert!(!s.contains("Re-run with -v"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
