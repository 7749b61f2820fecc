//! Application ports (traits) for external dependencies.
//!
//! All ports are driven (output) ports: the application calls them and
//! `railsmith-adapters` implements them.
//!
//! - `ProjectTree`: the application directory being configured
//! - `TemplateStore`: named template lookup
//! - `CommandRunner`: external processes (bundler, generators, migrations)

pub mod output;

pub use output::{CommandRunner, ProjectTree, TemplateStore};

#[cfg(test)]
pub use output::MockCommandRunner;
