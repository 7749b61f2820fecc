//! One error type for everything `railsmith-core` exposes.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Anything a railsmith core operation can fail with.
#[derive(Debug, Error, Clone)]
pub enum RailsmithError {
    /// The target tree or a binding does not match what a step expects.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration failures: I/O, external commands, replay protection.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl RailsmithError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category().into(),
            Self::Application(e) => e.category(),
        }
    }

    /// The 1-based script step at which a run stopped, if this error came
    /// from a generation run.
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Self::Application(ApplicationError::StepFailed { index, .. }) => Some(*index),
            _ => None,
        }
    }
}

/// Coarse grouping the CLI turns into exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    /// An external command exited non-zero or could not be started.
    External,
    Internal,
}

impl From<crate::domain::ErrorCategory> for ErrorCategory {
    fn from(category: crate::domain::ErrorCategory) -> Self {
        use crate::domain::ErrorCategory as Domain;
        match category {
            Domain::Validation => Self::Validation,
            Domain::Compatibility => Self::Compatibility,
            Domain::NotFound => Self::NotFound,
            Domain::Internal => Self::Internal,
        }
    }
}

pub type RailsmithResult<T> = Result<T, RailsmithError>;
