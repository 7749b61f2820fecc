//! Text anchor matching.
//!
//! An [`Anchor`] marks a place in a file's text: either a literal substring or
//! a regular expression. Matching is a pure function over `&str`; nothing here
//! touches the project tree.
//!
//! Two policies live here and nowhere else:
//!
//! - [`locate`] returns the **first** match in document order. Insert
//!   operations splice at that match and fail when there is none.
//! - [`substitute_all`] replaces **every** non-overlapping match, left to
//!   right, and returns the content unchanged when there is none.

use std::fmt;

use regex::{NoExpand, Regex};

use crate::domain::error::DomainError;

/// A compiled regular expression that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, DomainError> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| DomainError::InvalidPattern {
            pattern: source.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

/// Where in a file a mutation should happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Exact substring. An empty literal matches at offset 0.
    Literal(String),
    /// Regular expression (Rust `regex` syntax; `\z` is end of text).
    Pattern(Pattern),
}

impl Anchor {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn pattern(source: impl Into<String>) -> Result<Self, DomainError> {
        Pattern::new(source).map(Self::Pattern)
    }

    /// Anchor matching the very end of the text.
    pub fn end_of_file() -> Self {
        match Pattern::new(r"\z") {
            Ok(p) => Self::Pattern(p),
            Err(_) => unreachable!(r"\z is a valid pattern"),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Pattern(p) => write!(f, "/{}/", p.as_str()),
        }
    }
}

/// Byte range of a match inside the searched content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// Find the first occurrence of `anchor` in `content`.
pub fn locate(content: &str, anchor: &Anchor) -> Option<Match> {
    match anchor {
        Anchor::Literal(text) => content.find(text.as_str()).map(|start| Match {
            start,
            end: start + text.len(),
        }),
        Anchor::Pattern(p) => p.regex.find(content).map(|m| Match {
            start: m.start(),
            end: m.end(),
        }),
    }
}

/// Count the non-overlapping occurrences of `anchor` in `content`.
pub fn count(content: &str, anchor: &Anchor) -> usize {
    match anchor {
        Anchor::Literal(text) if text.is_empty() => 0,
        Anchor::Literal(text) => content.matches(text.as_str()).count(),
        Anchor::Pattern(p) => p.regex.find_iter(content).count(),
    }
}

/// Replace every non-overlapping occurrence of `anchor`, left to right.
///
/// The replacement is inserted verbatim; `$1` style group references are not
/// expanded. Returns the new content and the number of replacements made.
pub fn substitute_all(content: &str, anchor: &Anchor, replacement: &str) -> (String, usize) {
    let hits = count(content, anchor);
    if hits == 0 {
        return (content.to_string(), 0);
    }

    let replaced = match anchor {
        Anchor::Literal(text) => content.replace(text.as_str(), replacement),
        Anchor::Pattern(p) => p
            .regex
            .replace_all(content, NoExpand(replacement))
            .into_owned(),
    };
    (replaced, hits)
}
