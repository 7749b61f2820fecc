//! Application layer errors.
//!
//! Failures of orchestration: I/O against the project tree, external
//! commands, and the step wrapper that records where a run stopped. Rule
//! violations are `DomainError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, RailsmithError};

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// External command exited with a non-zero status.
    #[error("Command `{command}` exited with status {exit_code}")]
    ExternalCommandFailed { command: String, exit_code: i32 },

    /// External command could not be started at all.
    #[error("Could not start `{command}`: {reason}")]
    CommandSpawnFailed { command: String, reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Template store access failed (lock poisoned, unreadable directory).
    #[error("Template store error: {reason}")]
    StoreError { reason: String },

    /// The tree already carries the marker of a completed run.
    #[error("Application at {path} was already configured")]
    AlreadyApplied { path: PathBuf },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A script step failed; the run stopped there.
    #[error("Step {index} ({step}) failed: {source}")]
    StepFailed {
        index: usize,
        step: String,
        #[source]
        source: Box<RailsmithError>,
    },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ExternalCommandFailed { command, .. } => vec![
                format!("Run `{}` by hand inside the application to see its output", command),
                "Fix the problem, regenerate the application and run railsmith again".into(),
            ],
            Self::CommandSpawnFailed { command, .. } => vec![
                format!("Make sure `{}` is installed and on PATH", command),
                "Try: railsmith apply --skip-bundle to skip dependency installation".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreError { .. } => vec![
                "Check the templates.local_path override directory".into(),
            ],
            Self::AlreadyApplied { path } => vec![
                format!("Found {}", path.display()),
                "Appends and inserts are not replay-safe; a second run duplicates content".into(),
                "Use --force to run anyway".into(),
            ],
            Self::StepFailed { index, source, .. } => {
                let mut out = source.suggestions();
                out.push(format!(
                    "Steps before {} were applied; the tree is partially configured",
                    index
                ));
                out
            }
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ExternalCommandFailed { .. } | Self::CommandSpawnFailed { .. } => {
                ErrorCategory::External
            }
            Self::FilesystemError { .. } | Self::StoreError { .. } => ErrorCategory::Internal,
            Self::AlreadyApplied { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::StepFailed { source, .. } => source.category(),
        }
    }
}
