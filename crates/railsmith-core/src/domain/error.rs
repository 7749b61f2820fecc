// ============================================================================
// domain/error.rs - MUTATION ENGINE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so a failed step can be reported after the fact)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Template '{template_id}' not found")]
    TemplateNotFound { template_id: String },

    #[error("Template '{template_id}' uses placeholder '{{{{{placeholder}}}}}' with no binding")]
    MissingBinding {
        template_id: String,
        placeholder: String,
    },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    // ========================================================================
    // Mutation Errors
    // ========================================================================
    #[error("Anchor {anchor} not found in {path}")]
    AnchorNotFound { path: String, anchor: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { template_id } => vec![
                format!("No template is registered as '{}'", template_id),
                "Try: railsmith templates".into(),
                "Check the templates.local_path override directory".into(),
            ],
            Self::MissingBinding {
                template_id,
                placeholder,
            } => vec![
                format!(
                    "Template '{}' expects a value for {}",
                    template_id, placeholder
                ),
                "Remove the placeholder from the override template or supply the binding".into(),
            ],
            Self::AnchorNotFound { path, anchor } => vec![
                format!("{} does not contain {}", path, anchor),
                "The file was probably changed by a different framework version".into(),
                "The tree is partially configured; regenerate the app and run again".into(),
            ],
            Self::FileNotFound { path } => vec![
                format!("Expected {} to exist in the application", path),
                "Run railsmith inside a freshly generated Rails application".into(),
            ],
            Self::InvalidPattern { pattern, .. } => vec![
                format!("Pattern '{}' is not a valid regular expression", pattern),
                "This is a bug in the recipe, please report it".into(),
            ],
            Self::InvalidConfiguration(msg) => vec![
                "Check your configuration".into(),
                format!("Details: {}", msg),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration(_)
            | Self::MissingRequiredField { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::TemplateNotFound { .. } | Self::FileNotFound { .. } => ErrorCategory::NotFound,
            Self::AnchorNotFound { .. } | Self::MissingBinding { .. } => {
                ErrorCategory::Compatibility
            }
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
