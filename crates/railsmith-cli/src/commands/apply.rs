//! Implementation of the `railsmith apply` command.
//!
//! Translates arguments and config into a `Configuration`, builds the recipe
//! script and hands it to `GenerationService`. No recipe logic lives here.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use railsmith_adapters::{
    DirectoryStore, InMemoryStore, LayeredStore, LocalProjectTree, ProcessRunner, RecipeOptions,
    rails_script, recipe::detect,
};
use railsmith_core::{
    application::{
        ApplicationError, GenerationReport, GenerationService, MARKER_FILE, MutationEffect,
        RunOptions, StepEvent, StepOutcome, TemplateService, ports::TemplateStore,
    },
    domain::{
        Bindings, CommandSpec, Configuration, CssFramework, Database, Port, Step,
        entities::configuration::{DEFAULT_RAILS_VERSION, DEFAULT_RUBY_VERSION},
    },
};

use crate::{
    cli::{ApplyArgs, GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt,
};

/// Files every `rails new` tree has; checked before anything is written.
const RAILS_MARKERS: [&str; 2] = ["Gemfile", "config/application.rb"];

/// Execute `railsmith apply`.
///
/// 1. Check the directory is a generated Rails application
/// 2. Resolve database, CSS and port (flag, then config, then prompt)
/// 3. Build the recipe script
/// 4. `--dry-run`: print the plan and stop
/// 5. Run the script, reporting each step
#[instrument(skip_all, fields(app_dir = %args.app_dir.display()))]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Target directory
    let root = check_app_dir(&args.app_dir)?;
    let app_name = app_name(&root)?;
    let tree = LocalProjectTree::open(&root)?;

    if !args.dry_run && !args.force && root.join(MARKER_FILE).exists() {
        return Err(ApplicationError::AlreadyApplied {
            path: root.join(MARKER_FILE),
        }
        .into());
    }

    // 2. Answers
    let database = resolve_database(&args, &config)?;
    let css = resolve_css(&args, &config)?;
    let port = resolve_port(&args, &config)?;

    let configuration = Configuration::builder()
        .app_name(app_name)
        .database(database)
        .css_framework(css)
        .port(port)
        .ruby_version(detect::ruby_version(&tree).unwrap_or_else(|| DEFAULT_RUBY_VERSION.into()))
        .rails_version(
            detect::rails_version(&tree).unwrap_or_else(|| DEFAULT_RAILS_VERSION.into()),
        )
        .build()?;
    debug!(configuration = %configuration, "configuration resolved");

    // 3. Script
    let options = recipe_options(&args, &config)?;
    let script = rails_script(&configuration, &options)?;

    let service = GenerationService::new(
        Box::new(tree),
        TemplateService::new(template_store(&config)?),
        Box::new(ProcessRunner::new().quiet(quiet_commands(&global, &output))),
    );

    // 4. Dry run
    if args.dry_run {
        let plan = service.plan(&script);
        output.json(&plan)?;
        output.header(&format!(
            "Dry run: {} steps against {}",
            plan.len(),
            root.display()
        ))?;
        for step in &plan {
            let flag = if step.replay_safe { " " } else { "*" };
            output.print(&format!(
                "{flag}{:>4}  {:<12} {}",
                step.index, step.phase, step.description
            ))?;
        }
        output.print("")?;
        output.info("* changes the file again if replayed; not safe to run twice")?;
        return Ok(());
    }

    show_configuration(&configuration, &root, &output)?;
    info!(app = configuration.app_name(), "Apply started");

    // 5. Run
    let bindings = Bindings::from_configuration(&configuration);
    let mut spinner: Option<ProgressBar> = None;
    let result = service.run_observed(
        &script,
        &bindings,
        RunOptions { force: args.force },
        &mut |event: StepEvent<'_>| {
            if let Err(e) = report_event(&output, &mut spinner, event) {
                warn!(error = %e, "failed to write progress");
            }
        },
    );
    if let Some(bar) = spinner.take() {
        bar.finish_and_clear();
    }
    let report = result?;

    info!(run_id = %report.run_id, steps = report.steps, "Apply completed");
    output.json(&ApplySummary::from(&report))?;
    print_summary(&report, &configuration, &output)?;
    Ok(())
}

// ── Directory checks ──────────────────────────────────────────────────────────

fn check_app_dir(path: &Path) -> CliResult<PathBuf> {
    if !path.is_dir() {
        return Err(CliError::AppDirNotFound {
            path: path.to_path_buf(),
        });
    }
    if let Some(missing) = RAILS_MARKERS.into_iter().find(|m| !path.join(m).is_file()) {
        return Err(CliError::NotARailsApp {
            path: path.to_path_buf(),
            missing,
        });
    }
    path.canonicalize().map_err(|e| CliError::IoError {
        message: format!("Failed to resolve '{}'", path.display()),
        source: e,
    })
}

/// The application name is the directory name, as `rails new` chose it.
fn app_name(root: &Path) -> CliResult<String> {
    root.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("cannot derive an application name from '{}'", root.display()),
            source: None,
        })
}

// ── Answer resolution ─────────────────────────────────────────────────────────

fn resolve_database(args: &ApplyArgs, config: &AppConfig) -> CliResult<Database> {
    match args.database {
        Some(db) => Ok(db.into()),
        None => config
            .defaults
            .database
            .parse::<Database>()
            .map_err(|e| CliError::ConfigError {
                message: "defaults.database is not a database name".into(),
                source: Some(Box::new(e)),
            }),
    }
}

fn resolve_css(args: &ApplyArgs, config: &AppConfig) -> CliResult<CssFramework> {
    match args.css {
        Some(css) => Ok(css.into()),
        None => config
            .defaults
            .css
            .parse::<CssFramework>()
            .map_err(|e| CliError::ConfigError {
                message: "defaults.css is not a CSS framework".into(),
                source: Some(Box::new(e)),
            }),
    }
}

/// `--port`, then `defaults.port`, then the prompt. `--yes` and `--dry-run`
/// never prompt.
fn resolve_port(args: &ApplyArgs, config: &AppConfig) -> CliResult<Port> {
    if let Some(input) = &args.port {
        return Ok(Port::from_input(input));
    }
    if let Some(value) = config.defaults.port {
        return Ok(Port::new(value).unwrap_or_default());
    }
    if args.yes || args.dry_run {
        return Ok(Port::DEFAULT);
    }
    prompt::ask_port()
}

fn recipe_options(args: &ApplyArgs, config: &AppConfig) -> CliResult<RecipeOptions> {
    let bundle_command =
        CommandSpec::parse(&config.commands.bundle).ok_or_else(|| CliError::ConfigError {
            message: "commands.bundle is empty".into(),
            source: None,
        })?;
    Ok(RecipeOptions {
        bundle_command,
        skip_bundle: args.skip_bundle || config.commands.skip_bundle,
    })
}

/// Built-in templates, shadowed by `templates.local_path` when configured.
pub(crate) fn template_store(config: &AppConfig) -> CliResult<Box<dyn TemplateStore>> {
    let builtin = Box::new(InMemoryStore::with_builtin());
    match &config.templates.local_path {
        Some(dir) => {
            let local = DirectoryStore::load(dir)?;
            debug!(dir = %dir.display(), templates = local.len(), "local templates loaded");
            Ok(Box::new(LayeredStore::new(Box::new(local), builtin)))
        }
        None => Ok(builtin),
    }
}

/// Child output is hidden while a spinner stands in for it, and always in
/// JSON mode so stdout stays one document.
fn quiet_commands(global: &GlobalArgs, output: &OutputManager) -> bool {
    output.format() == OutputFormat::Json || (global.verbose == 0 && output.spinner_enabled())
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn show_configuration(
    configuration: &Configuration,
    root: &Path,
    output: &OutputManager,
) -> std::io::Result<()> {
    output.header(&format!("Configuring '{}'", configuration.app_name()))?;
    output.print(&format!("  Directory: {}", root.display()))?;
    output.print(&format!("  Database:  {}", configuration.database()))?;
    output.print(&format!("  CSS:       {}", configuration.css_framework()))?;
    output.print(&format!("  Port:      {}", configuration.port()))?;
    output.print(&format!(
        "  Ruby:      {}  Rails: {}",
        configuration.ruby_version(),
        configuration.rails_version()
    ))?;
    output.print("")
}

fn report_event(
    output: &OutputManager,
    spinner: &mut Option<ProgressBar>,
    event: StepEvent<'_>,
) -> std::io::Result<()> {
    match event {
        StepEvent::Started(entry) => {
            if let Step::Run(command) = entry.step {
                *spinner = output.spinner(format!("{command}"));
            }
            Ok(())
        }
        StepEvent::Finished(entry, outcome) => {
            if let Some(bar) = spinner.take() {
                bar.finish_and_clear();
            }
            let target = match entry.step {
                Step::Run(command) => command.to_string(),
                step => step
                    .target()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            };
            match outcome {
                StepOutcome::Announced => match entry.step {
                    Step::Announce(message) => output.info(message),
                    _ => Ok(()),
                },
                StepOutcome::CommandTolerated(code) => {
                    output.warning(&format!("{target} exited with {code}; continuing"))
                }
                other => output.status(status_verb(entry.step, other), &target),
            }
        }
    }
}

fn status_verb(step: &Step, outcome: StepOutcome) -> &'static str {
    match (step, outcome) {
        (_, StepOutcome::Mutated(MutationEffect::Unchanged)) => "identical",
        (_, StepOutcome::Mutated(MutationEffect::Created) | StepOutcome::Rendered) => "create",
        (Step::Mutate(op), StepOutcome::Mutated(MutationEffect::Changed)) => match op.kind() {
            "create" => "force",
            "append" => "append",
            "substitute" => "gsub",
            _ => "insert",
        },
        (_, StepOutcome::MadeExecutable) => "chmod",
        _ => "run",
    }
}

fn print_summary(
    report: &GenerationReport,
    configuration: &Configuration,
    output: &OutputManager,
) -> std::io::Result<()> {
    output.print("")?;
    output.success(&format!(
        "'{}' configured: {} steps, {} files",
        configuration.app_name(),
        report.steps,
        report.files_touched.len()
    ))?;
    for (index, command, code) in &report.tolerated_failures {
        output.warning(&format!("Step {index}: {command} exited with {code}"))?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", configuration.app_name()))?;
    output.print("  overmind start")?;
    output.print(&format!(
        "  open http://localhost:{}",
        configuration.port()
    ))
}

/// JSON view of a completed run.
#[derive(Debug, Serialize)]
struct ApplySummary {
    run_id: String,
    steps: usize,
    mutations: usize,
    commands: usize,
    files_touched: Vec<String>,
    tolerated_failures: Vec<ToleratedFailure>,
}

#[derive(Debug, Serialize)]
struct ToleratedFailure {
    step: usize,
    command: String,
    exit_code: i32,
}

impl From<&GenerationReport> for ApplySummary {
    fn from(report: &GenerationReport) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            steps: report.steps,
            mutations: report.mutations,
            commands: report.commands,
            files_touched: report.files_touched.iter().map(ToString::to_string).collect(),
            tolerated_failures: report
                .tolerated_failures
                .iter()
                .map(|(step, command, exit_code)| ToleratedFailure {
                    step: *step,
                    command: command.clone(),
                    exit_code: *exit_code,
                })
                .collect(),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
