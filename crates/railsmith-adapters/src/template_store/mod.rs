//! Template store adapters.

mod directory;
mod layered;
mod memory;

pub use directory::DirectoryStore;
pub use layered::LayeredStore;
pub use memory::InMemoryStore;
