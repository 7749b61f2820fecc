//! Driven (output) ports, implemented by infrastructure.

use std::path::Path;

use crate::domain::{CommandSpec, RelativePath, Template, TemplateId};
use crate::error::RailsmithResult;

/// The application directory being configured.
///
/// Every path is relative to [`ProjectTree::root`].
///
/// Implemented by:
/// - `railsmith_adapters::filesystem::LocalProjectTree` (production)
/// - `railsmith_adapters::filesystem::MemoryProjectTree` (tests)
pub trait ProjectTree: Send + Sync {
    /// Absolute location of the tree; external commands run here.
    fn root(&self) -> &Path;

    /// Current content, or `None` when the file does not exist.
    fn read_file(&self, path: &RelativePath) -> RailsmithResult<Option<String>>;

    /// Replace the file's content. Parent directories must already exist.
    fn write_file(&self, path: &RelativePath, content: &str) -> RailsmithResult<()>;

    fn exists(&self, path: &RelativePath) -> bool;

    fn create_dir_all(&self, path: &RelativePath) -> RailsmithResult<()>;

    /// Add the executable bits to an existing file.
    fn set_executable(&self, path: &RelativePath) -> RailsmithResult<()>;
}

/// Named template lookup.
///
/// Implemented by:
/// - `railsmith_adapters::template_store::InMemoryStore` (built-in templates)
/// - `railsmith_adapters::template_store::DirectoryStore` (user overrides)
pub trait TemplateStore: Send + Sync {
    /// # Errors
    /// `DomainError::TemplateNotFound` for an unknown id.
    fn get(&self, id: &TemplateId) -> RailsmithResult<Template>;

    /// Every template, sorted by id.
    fn list(&self) -> RailsmithResult<Vec<Template>>;
}

/// External process execution.
///
/// Implemented by:
/// - `railsmith_adapters::runner::ProcessRunner` (production)
/// - `railsmith_adapters::runner::RecordingRunner` (tests)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion from `root` (or `root/command.dir`) and
    /// return its exit status.
    ///
    /// # Errors
    /// `ApplicationError::CommandSpawnFailed` when the process cannot start.
    /// A non-zero exit is not an error here.
    fn run(&self, command: &CommandSpec, root: &Path) -> RailsmithResult<i32>;
}
