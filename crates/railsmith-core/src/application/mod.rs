//! Application layer for railsmith.
//!
//! - **Services**: use-case orchestration (`GenerationService`,
//!   `TemplateService`, `FileMutator`)
//! - **Ports**: traits for the project tree, template store and command runner
//! - **Errors**: orchestration failures
//!
//! No rules live here. Content computation belongs to `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    FileMutator, GenerationReport, GenerationService, MARKER_FILE, MutationEffect, PlannedStep,
    RunOptions, StepEvent, StepOutcome, TemplateInfo, TemplateService,
};

pub use ports::{CommandRunner, ProjectTree, TemplateStore};

pub use error::ApplicationError;
