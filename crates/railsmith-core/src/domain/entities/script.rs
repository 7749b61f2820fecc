//! The generation script: an ordered list of steps in three phases.
//!
//! ```text
//!   Main ──▶ Bundle checkpoint ──▶ AfterBundle
//! ```
//!
//! Steps are numbered from 1 across all phases in execution order, so a
//! failure can be reported as "stopped at step N" regardless of phase.

use std::fmt;

use super::{common::RelativePath, mutation::MutationOp, template::TemplateId};

// ── CommandSpec ──────────────────────────────────────────────────────────────

/// An external command, run from the application root unless `dir` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<RelativePath>,
    /// A non-zero exit is logged and the script continues.
    pub tolerate_failure: bool,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
            tolerate_failure: false,
        }
    }

    /// Split a whitespace-separated command line. No shell quoting rules.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn in_dir(mut self, dir: impl Into<RelativePath>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn tolerating_failure(mut self) -> Self {
        self.tolerate_failure = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) || arg.is_empty() {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

// ── Step ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Progress message for the operator.
    Announce(String),
    Mutate(MutationOp),
    /// Render a stored template and create-or-overwrite `destination`.
    CopyTemplate {
        template: TemplateId,
        destination: RelativePath,
    },
    /// Set the executable bits on an existing file.
    MakeExecutable(RelativePath),
    Run(CommandSpec),
}

impl Step {
    pub fn announce(message: impl Into<String>) -> Self {
        Self::Announce(message.into())
    }

    pub fn copy_template(
        template: impl Into<TemplateId>,
        destination: impl Into<RelativePath>,
    ) -> Self {
        Self::CopyTemplate {
            template: template.into(),
            destination: destination.into(),
        }
    }

    pub fn run(program: &str, args: &[&str]) -> Self {
        Self::Run(CommandSpec::new(program, args.iter().copied()))
    }

    /// The file this step writes, if any.
    pub fn target(&self) -> Option<&RelativePath> {
        match self {
            Self::Mutate(op) => Some(op.path()),
            Self::CopyTemplate { destination, .. } => Some(destination),
            Self::MakeExecutable(path) => Some(path),
            Self::Announce(_) | Self::Run(_) => None,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Announce(_) => "announce",
            Self::Mutate(op) => op.kind(),
            Self::CopyTemplate { .. } => "template",
            Self::MakeExecutable(_) => "chmod",
            Self::Run(_) => "run",
        }
    }
}

impl From<MutationOp> for Step {
    fn from(op: MutationOp) -> Self {
        Self::Mutate(op)
    }
}

impl From<CommandSpec> for Step {
    fn from(cmd: CommandSpec) -> Self {
        Self::Run(cmd)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Announce(msg) => write!(f, "say {msg:?}"),
            Self::Mutate(op) => write!(f, "{op}"),
            Self::CopyTemplate {
                template,
                destination,
            } => write!(f, "template {template} -> {destination}"),
            Self::MakeExecutable(path) => write!(f, "chmod +x {path}"),
            Self::Run(cmd) => write!(f, "run {cmd}"),
        }
    }
}

// ── Phase ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Main,
    /// The dependency-install checkpoint between the two mutation rounds.
    Bundle,
    AfterBundle,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Bundle => "bundle",
            Self::AfterBundle => "after-bundle",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── GenerationScript ─────────────────────────────────────────────────────────

/// A step together with its position in the run.
#[derive(Debug, Clone, Copy)]
pub struct ScriptEntry<'a> {
    /// 1-based, counted across all phases.
    pub index: usize,
    pub phase: Phase,
    pub step: &'a Step,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationScript {
    main: Vec<Step>,
    bundle: Option<Step>,
    after_bundle: Vec<Step>,
}

impl GenerationScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to `phase`.
    ///
    /// Pushing to `Phase::Bundle` replaces the checkpoint command.
    pub fn push(&mut self, phase: Phase, step: impl Into<Step>) {
        let step = step.into();
        match phase {
            Phase::Main => self.main.push(step),
            Phase::Bundle => self.bundle = Some(step),
            Phase::AfterBundle => self.after_bundle.push(step),
        }
    }

    pub fn set_bundle(&mut self, command: CommandSpec) {
        self.bundle = Some(Step::Run(command));
    }

    pub fn has_bundle(&self) -> bool {
        self.bundle.is_some()
    }

    /// Every step in execution order.
    pub fn entries(&self) -> impl Iterator<Item = ScriptEntry<'_>> {
        let main = self.main.iter().map(|s| (Phase::Main, s));
        let bundle = self.bundle.iter().map(|s| (Phase::Bundle, s));
        let after = self.after_bundle.iter().map(|s| (Phase::AfterBundle, s));

        main.chain(bundle)
            .chain(after)
            .enumerate()
            .map(|(i, (phase, step))| ScriptEntry {
                index: i + 1,
                phase,
                step,
            })
    }

    pub fn len(&self) -> usize {
        self.main.len() + usize::from(self.bundle.is_some()) + self.after_bundle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutation operations in execution order.
    pub fn mutations(&self) -> impl Iterator<Item = &MutationOp> {
        self.entries().filter_map(|e| match e.step {
            Step::Mutate(op) => Some(op),
            _ => None,
        })
    }
}
