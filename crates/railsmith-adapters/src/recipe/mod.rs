//! The Rails application recipe.
//!
//! [`rails_script`] turns a [`Configuration`] into the full
//! [`GenerationScript`]:
//!
//! ```text
//! Main         Procfile, Overmind, Gemfile, dotfiles, bin/ scripts,
//!              initializers, environments, application.rb, README,
//!              home page, root route
//! Bundle       bundle install (skippable)
//! AfterBundle  generators and migrations, queue database, Solid Queue,
//!              jobs dashboard, importmap, layout head, Tailwind palette
//! ```
//!
//! The database and CSS choices are matched exactly once each, in
//! [`queue_database_steps`] and [`stylesheet_steps`].

pub mod detect;
mod files;
mod gemfile;

use railsmith_core::{
    domain::{
        Anchor, CommandSpec, Configuration, CssFramework, Database, GenerationScript, MutationOp,
        Phase, Step,
    },
    error::RailsmithResult,
};
use tracing::{debug, instrument};

use crate::builtin_templates as tpl;
use gemfile::{Gem, gem, gem_group};

const APPLICATION_RB: &str = "config/application.rb";
const ROUTES_RB: &str = "config/routes.rb";
const LAYOUT: &str = "app/views/layouts/application.html.erb";
const TAILWIND_CSS: &str = "app/assets/stylesheets/application.tailwind.css";

/// Knobs that are not part of the application configuration.
#[derive(Debug, Clone)]
pub struct RecipeOptions {
    pub bundle_command: CommandSpec,
    pub skip_bundle: bool,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            bundle_command: CommandSpec::new("bundle", ["install"]),
            skip_bundle: false,
        }
    }
}

/// Build the generation script for `config`.
///
/// # Errors
/// Only if one of the recipe's own regular expressions fails to compile.
#[instrument(skip_all, fields(config = %config))]
pub fn rails_script(
    config: &Configuration,
    options: &RecipeOptions,
) -> RailsmithResult<GenerationScript> {
    let mut script = GenerationScript::new();

    for step in main_steps(config) {
        script.push(Phase::Main, step);
    }
    if !options.skip_bundle {
        script.set_bundle(options.bundle_command.clone());
    }
    for step in after_bundle_steps(config)? {
        script.push(Phase::AfterBundle, step);
    }

    debug!(steps = script.len(), "recipe built");
    Ok(script)
}

// ── Main phase ───────────────────────────────────────────────────────────────

fn main_steps(config: &Configuration) -> Vec<Step> {
    let mut steps = vec![
        Step::announce("Creating a Procfile.dev file"),
        MutationOp::create("Procfile.dev", files::procfile_dev(config)).into(),
        Step::announce("Setting up Overmind"),
        MutationOp::create(".overmind.env", files::OVERMIND_ENV).into(),
        Step::announce("Adding gems"),
        gem_group(
            "development",
            &[
                Gem::new("brakeman"),
                Gem::new("bundle-audit"),
                Gem::new("letter_opener"),
                Gem::new("standard"),
            ],
        )
        .into(),
        gem(Gem::new("action_policy")).into(),
    ];
    if config.uses_sqlite() {
        steps.push(gem(Gem::new("litestack").version("~> 0.4.2")).into());
    }
    for name in [
        "lograge",
        "meta-tags",
        "mission_control-jobs",
        "rails-i18n",
        "rack-attack",
        "solid_queue",
    ] {
        steps.push(gem(Gem::new(name)).into());
    }
    steps.push(gem_group("production", &[Gem::new("aws-sdk-s3").no_require()]).into());

    steps.extend([
        Step::announce("Application configuration"),
        MutationOp::append(".gitignore", files::GITIGNORE_ENTRY).into(),
        MutationOp::create(".standard.yml", files::standard_yml(config)).into(),
        MutationOp::create(".solargraph.yml", files::SOLARGRAPH_YML).into(),
        MutationOp::create(".rubocop.yml", files::RUBOCOP_YML).into(),
        MutationOp::create("bin/setup", files::BIN_SETUP).into(),
        Step::MakeExecutable("bin/setup".into()),
        MutationOp::create("bin/ci", files::BIN_CI).into(),
        Step::MakeExecutable("bin/ci".into()),
        initializer("generators.rb", files::GENERATORS_INITIALIZER),
        initializer("lograge.rb", files::LOGRAGE_INITIALIZER),
        initializer("rack_attack.rb", files::RACK_ATTACK_INITIALIZER),
        environment("development", &files::development_settings(config)),
        environment("production", files::PRODUCTION_SETTINGS),
        insert_after(APPLICATION_RB, files::AFTER_TIME_ZONE, files::LOCALES),
        insert_after(APPLICATION_RB, files::AFTER_EAGER_LOAD, files::STORAGE_PROXY),
        insert_before(APPLICATION_RB, "  end", files::APPLICATION_SETTINGS),
        insert_after(
            APPLICATION_RB,
            files::APPLICATION_CLASS,
            files::RACK_ATTACK_MIDDLEWARE,
        ),
        Step::copy_template(tpl::README, "README.md"),
        Step::copy_template(tpl::HOME_CONTROLLER, "app/controllers/home_controller.rb"),
        Step::copy_template(tpl::HOME_INDEX, "app/views/home/index.html.erb"),
        MutationOp::substitute_all(
            ROUTES_RB,
            Anchor::literal(files::ROOT_ROUTE_COMMENT),
            files::ROOT_ROUTE,
        )
        .into(),
    ]);
    steps
}

// ── After-bundle phase ───────────────────────────────────────────────────────

fn after_bundle_steps(config: &Configuration) -> RailsmithResult<Vec<Step>> {
    let mut steps = vec![Step::announce("Running generators")];
    if config.uses_sqlite() {
        steps.push(generate("litestack:install"));
    }
    steps.extend([
        generate("action_policy:install"),
        rails_command("action_text:install"),
        rails_command("db:migrate"),
        rails_command("active_storage:install"),
        rails_command("db:migrate"),
        rails_command("solid_queue:install:migrations"),
    ]);

    steps.extend(queue_database_steps(config.database()));

    steps.extend([
        Step::copy_template(tpl::SOLID_QUEUE_YML, "config/solid_queue.yml"),
        MutationOp::insert_after(
            "Procfile.dev",
            Anchor::end_of_file(),
            files::SOLID_QUEUE_PROCESS,
        )
        .into(),
        insert_before(ROUTES_RB, "end", files::JOBS_ROUTE),
        generate("meta_tags:install"),
        insert_before(
            "config/importmap.rb",
            files::ACTIONTEXT_PIN,
            files::ACTIVESTORAGE_PIN,
        ),
        insert_before(
            "app/javascript/application.js",
            files::ACTIONTEXT_IMPORT,
            files::ACTIVESTORAGE_IMPORT,
        ),
        insert_before(LAYOUT, "</head>", files::HEAD_BOTTOM),
        insert_after(LAYOUT, "<head>", files::HEAD_TOP),
        CommandSpec::new("cp", ["database.yml", "database.yml.example"])
            .in_dir("config")
            .into(),
    ]);

    steps.extend(stylesheet_steps(config.css_framework())?);
    Ok(steps)
}

/// SQLite keeps Solid Queue in its own database; everything else shares the
/// primary one.
fn queue_database_steps(database: Database) -> Vec<Step> {
    match database {
        Database::Sqlite => vec![
            Step::copy_template(tpl::DATABASE_YML, "config/database.yml"),
            CommandSpec::new(
                "sh",
                [
                    "-c",
                    "mkdir db/queue_migrate && mv db/migrate/*solid_queue*.rb db/queue_migrate",
                ],
            )
            .into(),
            rails_command("db:migrate:queue"),
            insert_after(APPLICATION_RB, files::QUEUE_ADAPTER, files::QUEUE_CONNECTS_TO),
        ],
        Database::Postgresql | Database::Other => vec![rails_command("db:migrate")],
    }
}

fn stylesheet_steps(css: CssFramework) -> RailsmithResult<Vec<Step>> {
    match css {
        CssFramework::Tailwind => {
            let mut steps = vec![
                Step::announce("Configuring Tailwind"),
                insert_before(
                    "config/tailwind.config.js",
                    files::FONT_FAMILY,
                    files::TAILWIND_PALETTE,
                ),
                MutationOp::create("app/assets/stylesheets/config.css", files::CONFIG_CSS).into(),
                insert_after(TAILWIND_CSS, files::TAILWIND_BASE, files::CONFIG_CSS_IMPORT),
                insert_before(
                    TAILWIND_CSS,
                    files::ACTIONTEXT_CSS_IMPORT,
                    files::TRIX_CSS_IMPORT,
                ),
                Step::copy_template(tpl::TRIX_CSS, "app/assets/stylesheets/trix.css"),
                MutationOp::substitute_all(LAYOUT, Anchor::pattern("container")?, "max-w-2xl")
                    .into(),
            ];
            for (pattern, replacement) in files::TAILWIND_DIRECTIVES {
                steps.push(
                    MutationOp::substitute_all(
                        TAILWIND_CSS,
                        Anchor::pattern(regex::escape(pattern))?,
                        replacement,
                    )
                    .into(),
                );
            }
            Ok(steps)
        }
        CssFramework::Other => Ok(Vec::new()),
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn initializer(name: &str, content: &str) -> Step {
    MutationOp::create(format!("config/initializers/{name}"), content).into()
}

/// Insert `content` at the top of the `Rails.application.configure` block of
/// `config/environments/<env>.rb`, indented by two spaces.
fn environment(env: &str, content: &str) -> Step {
    MutationOp::insert_after(
        format!("config/environments/{env}.rb"),
        Anchor::literal("Rails.application.configure do\n"),
        indent(content, 2),
    )
    .into()
}

fn insert_after(path: &str, anchor: &str, content: &str) -> Step {
    MutationOp::insert_after(path, Anchor::literal(anchor), content).into()
}

fn insert_before(path: &str, anchor: &str, content: &str) -> Step {
    MutationOp::insert_before(path, Anchor::literal(anchor), content).into()
}

fn generate(generator: &str) -> Step {
    CommandSpec::new("bin/rails", ["generate", generator]).into()
}

fn rails_command(task: &str) -> Step {
    CommandSpec::new("bin/rails", [task]).into()
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                "\n".to_string()
            } else {
                format!("{pad}{line}\n")
            }
        })
        .collect()
}
