use crate::domain::error::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A project-tree path guaranteed to be relative to the application root.
///
/// Invariant: never absolute and never climbs out of the root with `..`.
/// Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the path is absolute or escapes the root (use `try_new` for
    /// fallible construction). Intended for recipe literals.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        match Self::try_new(path) {
            Ok(path) => path,
            Err(e) => panic!("invalid RelativePath: {e}"),
        }
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(DomainError::PathEscapesRoot {
                path: path.display().to_string(),
            });
        }
        Ok(Self(path))
    }

    /// Parent directory, if the path has one that is not the root itself.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| Self(p.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or("")
    }

}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
