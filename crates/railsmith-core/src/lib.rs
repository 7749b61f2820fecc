//! railsmith core - hexagonal architecture implementation
//!
//! Domain and application layers of the railsmith application configurator:
//! an idempotence-aware file transformation engine that applies an ordered
//! generation script to a freshly generated Rails application.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           railsmith-cli (CLI)           │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, TemplateService,    │
//! │  FileMutator)                           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (ProjectTree, TemplateStore,            │
//! │  CommandRunner)                         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    railsmith-adapters (Infrastructure)  │
//! │ (LocalProjectTree, ProcessRunner, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Configuration, Anchor, MutationOp,     │
//! │  Template, GenerationScript)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use railsmith_core::prelude::*;
//!
//! # fn demo(tree: Box<dyn ProjectTree>, store: Box<dyn TemplateStore>, runner: Box<dyn CommandRunner>, script: GenerationScript) -> RailsmithResult<()> {
//! let config = Configuration::builder().app_name("blog").build()?;
//! let service = GenerationService::new(tree, TemplateService::new(store), runner);
//! let report = service.run(&script, &Bindings::from_configuration(&config), RunOptions::default())?;
//! println!("{} steps", report.steps);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        GenerationReport, GenerationService, RunOptions, TemplateService,
        ports::{CommandRunner, ProjectTree, TemplateStore},
    };
    pub use crate::domain::{
        Anchor, Bindings, CommandSpec, Configuration, CssFramework, Database, GenerationScript,
        MutationOp, Phase, Port, RelativePath, Step, Template, TemplateId,
    };
    pub use crate::error::{RailsmithError, RailsmithResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
