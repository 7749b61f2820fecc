//! Infrastructure adapters for railsmith.
//!
//! Implements the ports defined in `railsmith_core::application::ports` and
//! holds the Rails recipe itself. All I/O and process spawning lives here.

pub mod builtin_templates;
pub mod filesystem;
pub mod recipe;
pub mod runner;
pub mod template_store;

pub use filesystem::{LocalProjectTree, MemoryProjectTree};
pub use recipe::{RecipeOptions, rails_script};
pub use runner::{ProcessRunner, RecordingRunner};
pub use template_store::{DirectoryStore, InMemoryStore, LayeredStore};
