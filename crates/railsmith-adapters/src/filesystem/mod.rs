//! Project tree adapters.

mod local;
mod memory;

pub use local::LocalProjectTree;
pub use memory::MemoryProjectTree;
