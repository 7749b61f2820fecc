//! Read facts about the generated application from its files.
//!
//! Only used to fill README bindings; every function returns `None` rather
//! than failing when a file is missing or unparseable.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use railsmith_core::{application::ports::ProjectTree, domain::RelativePath};

/// Ruby version from `.ruby-version` (`ruby-3.3.0` and `3.3.0` both work).
pub fn ruby_version(tree: &dyn ProjectTree) -> Option<String> {
    let text = tree
        .read_file(&RelativePath::new(".ruby-version"))
        .ok()
        .flatten()?;
    let line = text.lines().next()?.trim();
    let version = line.strip_prefix("ruby-").unwrap_or(line);
    (!version.is_empty()).then(|| version.to_string())
}

/// Rails version, preferring the resolved one in `Gemfile.lock` over the
/// requirement in `Gemfile`.
pub fn rails_version(tree: &dyn ProjectTree) -> Option<String> {
    static LOCKED: OnceLock<Option<Regex>> = OnceLock::new();
    static REQUIRED: OnceLock<Option<Regex>> = OnceLock::new();

    let locked = LOCKED
        .get_or_init(|| Regex::new(r"(?m)^    rails \(([^)]+)\)$").ok())
        .as_ref()?;
    let required = REQUIRED
        .get_or_init(|| Regex::new(r#"(?m)^gem\s+["']rails["']\s*,\s*["'][~>=\s]*([0-9][^"']*)["']"#).ok())
        .as_ref()?;

    let from_lock = read(tree, "Gemfile.lock").and_then(|t| capture(locked, &t));
    let version = from_lock.or_else(|| read(tree, "Gemfile").and_then(|t| capture(required, &t)));
    debug!(?version, "detected rails version");
    version
}

fn read(tree: &dyn ProjectTree, path: &str) -> Option<String> {
    tree.read_file(&RelativePath::new(path)).ok().flatten()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryProjectTree;

    #[test]
    fn ruby_version_strips_prefix() {
        let tree = MemoryProjectTree::new();
        tree.seed(".ruby-version", "ruby-3.3.0\n");
        assert_eq!(ruby_version(&tree).as_deref(), Some("3.3.0"));
    }

    #[test]
    fn ruby_version_missing_file() {
        assert!(ruby_version(&MemoryProjectTree::new()).is_none());
    }

    #[test]
    fn rails_version_prefers_lockfile() {
        let tree = MemoryProjectTree::new();
        tree.seed("Gemfile", "gem \"rails\", \"~> 7.1.0\"\n");
        tree.seed(
            "Gemfile.lock",
            "GEM\n  specs:\n    rails (7.1.3.2)\n      actioncable (= 7.1.3.2)\n",
        );
        assert_eq!(rails_version(&tree).as_deref(), Some("7.1.3.2"));
    }

    #[test]
    fn rails_version_from_gemfile_requirement() {
        let tree = MemoryProjectTree::new();
        tree.seed("Gemfile", "source \"x\"\ngem \"rails\", \"~> 7.1.3\"\n");
        assert_eq!(rails_version(&tree).as_deref(), Some("7.1.3"));
    }
}
