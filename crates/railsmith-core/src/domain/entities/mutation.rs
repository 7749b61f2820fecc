//! File mutation operations.
//!
//! A [`MutationOp`] names one atomic change to one file. Applying it is a pure
//! function from the file's current content (or its absence) to the new
//! content, so every failure (`FileNotFound`, `AnchorNotFound`) is known
//! before anything is written.

use std::fmt;

use super::{
    anchor::{self, Anchor},
    common::RelativePath,
};
use crate::domain::error::DomainError;

/// One atomic file transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    /// Write `content`, replacing whatever was there.
    CreateOrOverwrite { path: RelativePath, content: String },
    /// Concatenate `content` to an existing file.
    Append { path: RelativePath, content: String },
    /// Splice `content` immediately before the first match of `anchor`.
    InsertBefore {
        path: RelativePath,
        anchor: Anchor,
        content: String,
    },
    /// Splice `content` immediately after the first match of `anchor`.
    InsertAfter {
        path: RelativePath,
        anchor: Anchor,
        content: String,
    },
    /// Replace every match of `pattern`; zero matches is not an error.
    SubstituteAll {
        path: RelativePath,
        pattern: Anchor,
        replacement: String,
    },
}

impl MutationOp {
    pub fn create(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self::CreateOrOverwrite {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn append(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self::Append {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn insert_before(
        path: impl Into<RelativePath>,
        anchor: Anchor,
        content: impl Into<String>,
    ) -> Self {
        Self::InsertBefore {
            path: path.into(),
            anchor,
            content: content.into(),
        }
    }

    pub fn insert_after(
        path: impl Into<RelativePath>,
        anchor: Anchor,
        content: impl Into<String>,
    ) -> Self {
        Self::InsertAfter {
            path: path.into(),
            anchor,
            content: content.into(),
        }
    }

    pub fn substitute_all(
        path: impl Into<RelativePath>,
        pattern: Anchor,
        replacement: impl Into<String>,
    ) -> Self {
        Self::SubstituteAll {
            path: path.into(),
            pattern,
            replacement: replacement.into(),
        }
    }

    /// The file this operation targets.
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::CreateOrOverwrite { path, .. }
            | Self::Append { path, .. }
            | Self::InsertBefore { path, .. }
            | Self::InsertAfter { path, .. }
            | Self::SubstituteAll { path, .. } => path,
        }
    }

    /// Short operation name for logs and plans.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateOrOverwrite { .. } => "create",
            Self::Append { .. } => "append",
            Self::InsertBefore { .. } => "insert-before",
            Self::InsertAfter { .. } => "insert-after",
            Self::SubstituteAll { .. } => "substitute",
        }
    }

    /// Whether running this operation a second time yields the same file.
    ///
    /// Appends and anchor inserts duplicate their content on replay. A
    /// substitution is only safe when its replacement cannot match again.
    pub fn is_replay_safe(&self) -> bool {
        match self {
            Self::CreateOrOverwrite { .. } => true,
            Self::SubstituteAll {
                pattern,
                replacement,
                ..
            } => anchor::count(replacement, pattern) == 0,
            Self::Append { .. } | Self::InsertBefore { .. } | Self::InsertAfter { .. } => false,
        }
    }

    /// Compute the new content of the target file.
    ///
    /// `current` is `None` when the file does not exist.
    pub fn apply(&self, current: Option<&str>) -> Result<String, DomainError> {
        match self {
            Self::CreateOrOverwrite { content, .. } => Ok(content.clone()),
            Self::Append { path, content } => {
                let existing = require(path, current)?;
                let mut out = String::with_capacity(existing.len() + content.len());
                out.push_str(existing);
                out.push_str(content);
                Ok(out)
            }
            Self::InsertBefore {
                path,
                anchor,
                content,
            } => {
                let existing = require(path, current)?;
                let m = find(path, existing, anchor)?;
                Ok(splice(existing, m.start, content))
            }
            Self::InsertAfter {
                path,
                anchor,
                content,
            } => {
                let existing = require(path, current)?;
                let m = find(path, existing, anchor)?;
                Ok(splice(existing, m.end, content))
            }
            Self::SubstituteAll {
                path,
                pattern,
                replacement,
            } => {
                let existing = require(path, current)?;
                let (out, _) = anchor::substitute_all(existing, pattern, replacement);
                Ok(out)
            }
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertBefore { path, anchor, .. } => {
                write!(f, "insert-before {anchor} in {path}")
            }
            Self::InsertAfter { path, anchor, .. } => {
                write!(f, "insert-after {anchor} in {path}")
            }
            Self::SubstituteAll { path, pattern, .. } => {
                write!(f, "substitute {pattern} in {path}")
            }
            other => write!(f, "{} {}", other.kind(), other.path()),
        }
    }
}

fn require<'a>(path: &RelativePath, current: Option<&'a str>) -> Result<&'a str, DomainError> {
    current.ok_or_else(|| DomainError::FileNotFound {
        path: path.to_string(),
    })
}

fn find(path: &RelativePath, content: &str, anchor: &Anchor) -> Result<anchor::Match, DomainError> {
    anchor::locate(content, anchor).ok_or_else(|| DomainError::AnchorNotFound {
        path: path.to_string(),
        anchor: anchor.to_string(),
    })
}

fn splice(content: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(content.len() + insert.len());
    out.push_str(&content[..at]);
    out.push_str(insert);
    out.push_str(&content[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_ignores_previous_content() {
        let op = MutationOp::create("Procfile.dev", "web: bin/rails server\n");
        assert_eq!(op.apply(None).unwrap(), "web: bin/rails server\n");
        assert_eq!(op.apply(Some("old")).unwrap(), "web: bin/rails server\n");
    }

    #[test]
    fn append_requires_existing_file() {
        let op = MutationOp::append(".gitignore", "\n/config/database.yml\n");
        assert_eq!(
            op.apply(None),
            Err(DomainError::FileNotFound {
                path: ".gitignore".into()
            })
        );
        assert_eq!(
            op.apply(Some("/tmp")).unwrap(),
            "/tmp\n/config/database.yml\n"
        );
    }

    #[test]
    fn insert_before_splices_at_match_start() {
        let op = MutationOp::insert_before(
            "config/routes.rb",
            Anchor::literal("end"),
            "  mount Jobs, at: \"/jobs\"\n",
        );
        let out = op
            .apply(Some("Rails.application.routes.draw do\nend\n"))
            .unwrap();
        assert_eq!(
            out,
            "Rails.application.routes.draw do\n  mount Jobs, at: \"/jobs\"\nend\n"
        );
    }

    #[test]
    fn insert_after_uses_first_occurrence_only() {
        let op = MutationOp::insert_after("a.txt", Anchor::literal("<head>"), "[x]");
        let out = op.apply(Some("<head>1</head><head>2</head>")).unwrap();
        assert_eq!(out, "<head>[x]1</head><head>2</head>");
    }

    #[test]
    fn insert_after_end_of_file_appends() {
        let op = MutationOp::insert_after(
            "Procfile.dev",
            Anchor::end_of_file(),
            "solid_queue: bin/rails solid_queue:start",
        );
        let out = op.apply(Some("web: x\n")).unwrap();
        assert_eq!(out, "web: x\nsolid_queue: bin/rails solid_queue:start");
    }

    #[test]
    fn insert_without_anchor_fails() {
        let op = MutationOp::insert_before("a.rb", Anchor::literal("</head>"), "x");
        assert!(matches!(
            op.apply(Some("<html></html>")),
            Err(DomainError::AnchorNotFound { .. })
        ));
    }

    #[test]
    fn insert_on_missing_file_reports_file_not_found_first() {
        let op = MutationOp::insert_after("a.rb", Anchor::literal("x"), "y");
        assert!(matches!(
            op.apply(None),
            Err(DomainError::FileNotFound { .. })
        ));
    }

    #[test]
    fn substitute_without_match_is_noop() {
        let op = MutationOp::substitute_all(
            "config/routes.rb",
            Anchor::pattern("# root \"posts#index\"").unwrap(),
            "root \"home#index\"",
        );
        assert_eq!(op.apply(Some("nothing here")).unwrap(), "nothing here");
    }

    #[test]
    fn substitute_on_missing_file_fails() {
        let op = MutationOp::substitute_all("x", Anchor::literal("a"), "b");
        assert!(matches!(
            op.apply(None),
            Err(DomainError::FileNotFound { .. })
        ));
    }

    #[test]
    fn replay_safety_classification() {
        assert!(MutationOp::create("a", "").is_replay_safe());
        assert!(MutationOp::substitute_all("a", Anchor::literal("x"), "y").is_replay_safe());
        assert!(!MutationOp::append("a", "").is_replay_safe());
        assert!(!MutationOp::insert_after("a", Anchor::literal("x"), "y").is_replay_safe());
    }

    #[test]
    fn substitution_reintroducing_its_anchor_is_not_replay_safe() {
        let op = MutationOp::substitute_all("a.rb", Anchor::literal("end"), "end\nend");
        assert!(!op.is_replay_safe());

        let once = op.apply(Some("end\n")).unwrap();
        let twice = op.apply(Some(&once)).unwrap();
        assert_eq!(once, "end\nend\n");
        assert_ne!(once, twice);

        let pattern = Anchor::pattern(r"^css:.*$").unwrap();
        assert!(MutationOp::substitute_all("Procfile.dev", pattern.clone(), "").is_replay_safe());
        assert!(!MutationOp::substitute_all("Procfile.dev", pattern, "css: x").is_replay_safe());
    }

    #[test]
    fn display_names_anchor_and_path() {
        let op = MutationOp::insert_before("app.js", Anchor::literal("import"), "x");
        assert_eq!(op.to_string(), "insert-before \"import\" in app.js");
        assert_eq!(MutationOp::create("a/b", "").to_string(), "create a/b");
    }
}
