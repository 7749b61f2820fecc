//! Templates and placeholder interpolation.
//!
//! A [`Template`] is a named block of text that becomes the content of a
//! file mutation. Text may carry `{{NAME}}` placeholders; rendering replaces
//! each one with the matching entry of a [`Bindings`] map and fails loudly
//! when a binding is missing.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Template                                    │
//! │  ├── TemplateId      "readme"                │
//! │  ├── description     "Project README"        │
//! │  └── TemplateSource  Static | Owned          │
//! ├──────────────────────────────────────────────┤
//! │  Bindings            APP_NAME -> "blog"      │
//! │  render(template, bindings) -> String        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Only `{{` immediately followed by `[A-Za-z0-9_]+` and `}}` is a
//! placeholder. Everything else (Ruby `#{...}`, JS object literals, a lone
//! `{{ `) is copied through untouched.

use std::collections::BTreeMap;
use std::fmt;

use super::configuration::Configuration;
use crate::domain::error::DomainError;

// ============================================================================
// Bindings
// ============================================================================

/// Values available to `{{NAME}}` placeholders.
///
/// Built-in names derived from a [`Configuration`]:
///
/// | Name | Example |
/// |------|---------|
/// | `APP_NAME` | "my_blog" |
/// | `APP_NAME_PASCAL` | "MyBlog" |
/// | `APP_NAME_KEBAB` | "my-blog" |
/// | `DATABASE` | "sqlite" |
/// | `CSS_FRAMEWORK` | "tailwind" |
/// | `PORT` | "3000" |
/// | `RUBY_VERSION` | "3.3.0" |
/// | `RAILS_VERSION` | "7.1.3" |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for every built-in name of `config`.
    pub fn from_configuration(config: &Configuration) -> Self {
        let name = config.app_name();
        Self::new()
            .with("APP_NAME", name)
            .with("APP_NAME_PASCAL", to_pascal_case(name))
            .with("APP_NAME_KEBAB", to_kebab_case(name))
            .with("DATABASE", config.database().as_str())
            .with("CSS_FRAMEWORK", config.css_framework().as_str())
            .with("PORT", config.port().to_string())
            .with("RUBY_VERSION", config.ruby_version())
            .with("RAILS_VERSION", config.rails_version())
    }

    /// Add or replace a binding, consuming self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Template
// ============================================================================

/// Name under which a template is stored, e.g. `readme` or `trix.css`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(String);

impl TemplateId {
    /// # Panics
    /// Panics on an empty or whitespace-containing id; use `parse` for input.
    pub fn new(id: impl Into<String>) -> Self {
        match Self::parse(id.into()) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidTemplate("template id is empty".into()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTemplate(format!(
                "template id '{id}' contains whitespace"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of template text: compiled in or loaded at runtime.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compile-time string literal (e.g. `include_str!`)
    Static(&'static str),

    /// Runtime-owned string (override directory)
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    pub const fn is_builtin(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

/// A named, renderable block of text.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub description: String,
    pub source: TemplateSource,
}

impl Template {
    pub fn new(id: impl Into<TemplateId>, source: impl Into<TemplateSource>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            source: source.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Placeholder names in order of first appearance, without duplicates.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segment in parse(self.source.as_str()) {
            if let Segment::Placeholder(name) = segment {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// Substitute every placeholder.
    ///
    /// # Errors
    /// `MissingBinding` naming the first placeholder without a value. No
    /// partial output is produced.
    pub fn render(&self, bindings: &Bindings) -> Result<String, DomainError> {
        let text = self.source.as_str();
        let mut out = String::with_capacity(text.len());
        for segment in parse(text) {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Placeholder(name) => {
                    let value =
                        bindings
                            .get(name)
                            .ok_or_else(|| DomainError::MissingBinding {
                                template_id: self.id.to_string(),
                                placeholder: name.to_string(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

// ============================================================================
// Placeholder scanner
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn parse(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let name_len = after_open
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_open.len());

        if name_len > 0 && after_open[name_len..].starts_with("}}") {
            if open > 0 {
                segments.push(Segment::Text(&rest[..open]));
            }
            segments.push(Segment::Placeholder(&after_open[..name_len]));
            rest = &after_open[name_len + 2..];
        } else {
            // Not a placeholder: keep the first brace and rescan from the next
            segments.push(Segment::Text(&rest[..open + 1]));
            rest = &rest[open + 1..];
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert to PascalCase: `my_blog` -> `MyBlog`. This is the module name the
/// framework derives from the application directory.
fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, camelCase transitions and acronym
/// boundaries (`HTTPServer` -> `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
