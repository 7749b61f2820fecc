//! Generation Service - runs a `GenerationScript` against a project tree.
//!
//! Steps execute strictly in order. The first failure aborts the run and is
//! wrapped in `ApplicationError::StepFailed` carrying the 1-based step index;
//! everything before it stays written. There is no rollback.
//!
//! A successful run leaves a marker file at the tree root. Appends and
//! anchor inserts are not replay-safe, so a second run over a marked tree is
//! refused unless forced.

use std::collections::BTreeSet;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, ProjectTree},
        services::{FileMutator, MutationEffect, TemplateService},
    },
    domain::{
        Bindings, CommandSpec, DomainError, GenerationScript, MutationOp, RelativePath,
        ScriptEntry, Step,
    },
    error::RailsmithResult,
};

/// File written at the application root after a completed run.
pub const MARKER_FILE: &str = ".railsmith-applied";

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Run even when the marker file is present.
    pub force: bool,
}

/// Progress notifications, delivered around every step.
#[derive(Debug, Clone, Copy)]
pub enum StepEvent<'a> {
    Started(ScriptEntry<'a>),
    Finished(ScriptEntry<'a>, StepOutcome),
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Announced,
    Mutated(MutationEffect),
    Rendered,
    MadeExecutable,
    CommandSucceeded,
    /// Non-zero exit of a command marked `tolerate_failure`.
    CommandTolerated(i32),
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub steps: usize,
    pub mutations: usize,
    pub commands: usize,
    pub files_touched: BTreeSet<RelativePath>,
    /// (step index, command line, exit code)
    pub tolerated_failures: Vec<(usize, String, i32)>,
    pub messages: Vec<String>,
}

impl GenerationReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            steps: 0,
            mutations: 0,
            commands: 0,
            files_touched: BTreeSet::new(),
            tolerated_failures: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// One line of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlannedStep {
    pub index: usize,
    pub phase: String,
    pub kind: &'static str,
    pub description: String,
    /// Running this step twice produces the same tree.
    pub replay_safe: bool,
}

pub struct GenerationService {
    tree: Box<dyn ProjectTree>,
    templates: TemplateService,
    runner: Box<dyn CommandRunner>,
}

impl GenerationService {
    pub fn new(
        tree: Box<dyn ProjectTree>,
        templates: TemplateService,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            tree,
            templates,
            runner,
        }
    }

    /// Whether a previous run completed against this tree.
    pub fn already_applied(&self) -> bool {
        self.tree.exists(&RelativePath::new(MARKER_FILE))
    }

    /// Describe every step without touching the tree.
    pub fn plan(&self, script: &GenerationScript) -> Vec<PlannedStep> {
        script
            .entries()
            .map(|entry| PlannedStep {
                index: entry.index,
                phase: entry.phase.to_string(),
                kind: entry.step.kind(),
                description: entry.step.to_string(),
                replay_safe: match entry.step {
                    Step::Mutate(op) => op.is_replay_safe(),
                    Step::Run(_) => false,
                    _ => true,
                },
            })
            .collect()
    }

    pub fn run(
        &self,
        script: &GenerationScript,
        bindings: &Bindings,
        options: RunOptions,
    ) -> RailsmithResult<GenerationReport> {
        self.run_observed(script, bindings, options, &mut |_| {})
    }

    /// Execute the script, calling `observer` before and after each step.
    #[instrument(
        skip_all,
        fields(run_id = tracing::field::Empty, root = %self.tree.root().display(), steps = script.len())
    )]
    pub fn run_observed(
        &self,
        script: &GenerationScript,
        bindings: &Bindings,
        options: RunOptions,
        observer: &mut dyn FnMut(StepEvent<'_>),
    ) -> RailsmithResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        if self.already_applied() {
            if !options.force {
                return Err(ApplicationError::AlreadyApplied {
                    path: self.tree.root().join(MARKER_FILE),
                }
                .into());
            }
            warn!("Marker present; running again because of --force");
        }

        info!("Running generation script");
        let mut report = GenerationReport::new(run_id);
        let mut phase = None;

        for entry in script.entries() {
            if phase != Some(entry.phase) {
                info!(phase = %entry.phase, "Entering phase");
                phase = Some(entry.phase);
            }

            observer(StepEvent::Started(entry));
            let outcome = self
                .execute(entry, bindings, &mut report)
                .map_err(|source| ApplicationError::StepFailed {
                    index: entry.index,
                    step: entry.step.to_string(),
                    source: Box::new(source),
                })?;
            report.steps += 1;
            observer(StepEvent::Finished(entry, outcome));
        }

        self.write_marker(run_id, &report)?;
        info!(
            steps = report.steps,
            mutations = report.mutations,
            commands = report.commands,
            "Generation completed"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn execute(
        &self,
        entry: ScriptEntry<'_>,
        bindings: &Bindings,
        report: &mut GenerationReport,
    ) -> RailsmithResult<StepOutcome> {
        match entry.step {
            Step::Announce(message) => {
                info!(step = entry.index, "{message}");
                report.messages.push(message.clone());
                Ok(StepOutcome::Announced)
            }
            Step::Mutate(op) => {
                let effect = self.mutate(op, report)?;
                Ok(StepOutcome::Mutated(effect))
            }
            Step::CopyTemplate {
                template,
                destination,
            } => {
                let content = self.templates.render(template, bindings)?;
                self.mutate(&MutationOp::create(destination.clone(), content), report)?;
                Ok(StepOutcome::Rendered)
            }
            Step::MakeExecutable(path) => {
                if !self.tree.exists(path) {
                    return Err(DomainError::FileNotFound {
                        path: path.to_string(),
                    }
                    .into());
                }
                self.tree.set_executable(path)?;
                report.files_touched.insert(path.clone());
                Ok(StepOutcome::MadeExecutable)
            }
            Step::Run(command) => self.run_command(entry, command, report),
        }
    }

    fn mutate(
        &self,
        op: &MutationOp,
        report: &mut GenerationReport,
    ) -> RailsmithResult<MutationEffect> {
        let effect = FileMutator::new(self.tree.as_ref()).apply(op)?;
        report.mutations += 1;
        report.files_touched.insert(op.path().clone());
        Ok(effect)
    }

    #[instrument(skip_all, fields(step = entry.index, command = %command))]
    fn run_command(
        &self,
        entry: ScriptEntry<'_>,
        command: &CommandSpec,
        report: &mut GenerationReport,
    ) -> RailsmithResult<StepOutcome> {
        info!("Running external command");
        let exit_code = self.runner.run(command, self.tree.root())?;
        report.commands += 1;

        match exit_code {
            0 => Ok(StepOutcome::CommandSucceeded),
            code if command.tolerate_failure => {
                warn!(exit_code = code, "Command failed; continuing");
                report
                    .tolerated_failures
                    .push((entry.index, command.to_string(), code));
                Ok(StepOutcome::CommandTolerated(code))
            }
            code => Err(ApplicationError::ExternalCommandFailed {
                command: command.to_string(),
                exit_code: code,
            }
            .into()),
        }
    }

    fn write_marker(&self, run_id: Uuid, report: &GenerationReport) -> RailsmithResult<()> {
        let content = format!(
            "# Written by railsmith {}. Delete this file to allow another run.\nrun_id = \"{}\"\nsteps = {}\n",
            crate::VERSION,
            run_id,
            report.steps
        );
        self.tree
            .write_file(&RelativePath::new(MARKER_FILE), &content)
    }
}
