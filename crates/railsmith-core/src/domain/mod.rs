//! Core domain layer for railsmith.
//!
//! Pure data and pure functions: configuration values, anchors, mutation
//! operations, templates and the generation script model. Reading and
//! writing the project tree, running commands and looking templates up all
//! happen behind ports in the application layer.
//!
//! - **No I/O**: nothing here touches the filesystem or spawns processes
//! - **No logging**: observability belongs to the application layer
//! - **Immutable values**: every type is `Clone` and compared by value

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{
    anchor::{Anchor, Match, Pattern},
    common::RelativePath,
    configuration::{Configuration, ConfigurationBuilder, HasAppName, NoAppName},
    mutation::MutationOp,
    script::{CommandSpec, GenerationScript, Phase, ScriptEntry, Step},
    template::{Bindings, Template, TemplateId, TemplateSource},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{CssFramework, Database, Port};
