pub mod anchor;
pub mod common;
pub mod configuration;
pub mod mutation;
pub mod script;
pub mod template;

pub use anchor::Anchor;
pub use common::RelativePath;
pub use configuration::Configuration;
pub use mutation::MutationOp;
pub use script::{GenerationScript, Step};
pub use template::{Bindings, Template};
