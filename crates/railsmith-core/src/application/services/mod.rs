//! Application services - orchestrate use cases.

pub mod generation_service;
pub mod mutation_service;
pub mod template_service;

pub use generation_service::{
    GenerationReport, GenerationService, MARKER_FILE, PlannedStep, RunOptions, StepEvent,
    StepOutcome,
};
pub use mutation_service::{FileMutator, MutationEffect};
pub use template_service::{TemplateInfo, TemplateService};
