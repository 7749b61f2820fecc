//! Engine behaviour through the public API, with hand-written port
//! implementations.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use railsmith_core::application::{
    ApplicationError, FileMutator, GenerationService, MARKER_FILE, MutationEffect, RunOptions,
    TemplateService,
    ports::{CommandRunner, ProjectTree, TemplateStore},
};
use railsmith_core::domain::{
    Anchor, Bindings, CommandSpec, Configuration, DomainError, GenerationScript, MutationOp,
    Phase, Port, RelativePath, Step, Template, TemplateId,
};
use railsmith_core::error::{RailsmithError, RailsmithResult};

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Tree {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl Tree {
    fn with(files: &[(&str, &str)]) -> Self {
        let tree = Self::default();
        for (path, content) in files {
            tree.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
        }
        tree
    }

    fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl ProjectTree for Tree {
    fn root(&self) -> &Path {
        Path::new("/app")
    }

    fn read_file(&self, path: &RelativePath) -> RailsmithResult<Option<String>> {
        Ok(self.files.lock().unwrap().get(path.as_path()).cloned())
    }

    fn write_file(&self, path: &RelativePath, content: &str) -> RailsmithResult<()> {
        *self.writes.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(path.as_path().to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &RelativePath) -> bool {
        self.files.lock().unwrap().contains_key(path.as_path())
    }

    fn create_dir_all(&self, _path: &RelativePath) -> RailsmithResult<()> {
        Ok(())
    }

    fn set_executable(&self, _path: &RelativePath) -> RailsmithResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Runner {
    exit_codes: HashMap<String, i32>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl CommandRunner for Runner {
    fn run(&self, command: &CommandSpec, _root: &Path) -> RailsmithResult<i32> {
        let line = command.to_string();
        self.seen.lock().unwrap().push(line.clone());
        Ok(self.exit_codes.get(&line).copied().unwrap_or(0))
    }
}

struct Store(BTreeMap<String, Template>);

impl TemplateStore for Store {
    fn get(&self, id: &TemplateId) -> RailsmithResult<Template> {
        self.0.get(id.as_str()).cloned().ok_or_else(|| {
            DomainError::TemplateNotFound {
                template_id: id.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> RailsmithResult<Vec<Template>> {
        Ok(self.0.values().cloned().collect())
    }
}

fn store() -> Box<Store> {
    let readme = Template::new(
        "README.md",
        String::from("# {{APP_NAME_PASCAL}}\n\nbin/rails server -p {{PORT}}\n"),
    );
    Box::new(Store(BTreeMap::from([("README.md".to_string(), readme)])))
}

fn service(tree: &Tree, runner: &Runner) -> GenerationService {
    GenerationService::new(
        Box::new(tree.clone()),
        TemplateService::new(store()),
        Box::new(runner.clone()),
    )
}

fn bindings() -> Bindings {
    let config = Configuration::builder()
        .app_name("my_blog")
        .port(Port::new(4000).unwrap())
        .build()
        .unwrap();
    Bindings::from_configuration(&config)
}

// ── File mutator properties ───────────────────────────────────────────────────

#[test]
fn create_or_overwrite_is_idempotent() {
    let tree = Tree::default();
    let mutator = FileMutator::new(&tree);
    let op = MutationOp::create("config/initializers/lograge.rb", "enabled\n");

    assert_eq!(mutator.apply(&op).unwrap(), MutationEffect::Created);
    assert_eq!(mutator.apply(&op).unwrap(), MutationEffect::Unchanged);
    assert_eq!(
        tree.get("config/initializers/lograge.rb").as_deref(),
        Some("enabled\n")
    );
}

#[test]
fn substitution_without_matches_writes_unchanged_content() {
    let tree = Tree::with(&[("Procfile.dev", "web: bin/rails server\n")]);
    let op = MutationOp::substitute_all(
        "Procfile.dev",
        Anchor::pattern(r"^css:.*$").unwrap(),
        "",
    );

    let effect = FileMutator::new(&tree).apply(&op).unwrap();

    assert_eq!(effect, MutationEffect::Unchanged);
    assert_eq!(tree.get("Procfile.dev").as_deref(), Some("web: bin/rails server\n"));
    assert_eq!(tree.writes(), 1);
}

#[test]
fn substitution_replaces_every_match_literally() {
    let tree = Tree::with(&[("a.css", "red red red")]);
    let op = MutationOp::substitute_all("a.css", Anchor::literal("red"), "$blue");

    FileMutator::new(&tree).apply(&op).unwrap();

    assert_eq!(tree.get("a.css").as_deref(), Some("$blue $blue $blue"));
}

#[test]
fn insert_after_targets_first_occurrence_only() {
    let tree = Tree::with(&[("config/routes.rb", "end\nend\n")]);
    let op = MutationOp::insert_after("config/routes.rb", Anchor::literal("end"), " # first");

    FileMutator::new(&tree).apply(&op).unwrap();

    assert_eq!(tree.get("config/routes.rb").as_deref(), Some("end # first\nend\n"));
}

#[test]
fn insert_before_pattern_anchor() {
    let tree = Tree::with(&[("layout.erb", "<head>\n  <title>x</title>\n</head>\n")]);
    let op = MutationOp::insert_before(
        "layout.erb",
        Anchor::pattern(r"\s*</head>").unwrap(),
        "\n  <meta>",
    );

    FileMutator::new(&tree).apply(&op).unwrap();

    assert_eq!(
        tree.get("layout.erb").as_deref(),
        Some("<head>\n  <title>x</title>\n  <meta>\n</head>\n")
    );
}

#[test]
fn append_to_missing_file_fails_without_writing() {
    let tree = Tree::default();
    let err = FileMutator::new(&tree)
        .apply(&MutationOp::append("Gemfile", "gem \"x\"\n"))
        .unwrap_err();

    assert!(matches!(
        err,
        RailsmithError::Domain(DomainError::FileNotFound { .. })
    ));
    assert_eq!(tree.writes(), 0);
    assert!(tree.get("Gemfile").is_none());
}

#[test]
fn missing_anchor_fails_without_writing() {
    let tree = Tree::with(&[("config/application.rb", "module Blog\nend\n")]);
    let op = MutationOp::insert_after(
        "config/application.rb",
        Anchor::literal("class Application"),
        "\n  x",
    );

    let err = FileMutator::new(&tree).apply(&op).unwrap_err();

    assert!(matches!(
        err,
        RailsmithError::Domain(DomainError::AnchorNotFound { .. })
    ));
    assert_eq!(tree.writes(), 0);
}

// ── Generation service ────────────────────────────────────────────────────────

fn script() -> GenerationScript {
    let mut script = GenerationScript::new();
    script.push(Phase::Main, Step::announce("Creating a Procfile.dev file"));
    script.push(
        Phase::Main,
        MutationOp::create("Procfile.dev", "web: bin/rails server -p 4000\n"),
    );
    script.push(Phase::Main, Step::copy_template("README.md", "README.md"));
    script.set_bundle(CommandSpec::new("bundle", ["install"]));
    script.push(Phase::AfterBundle, Step::run("bin/rails", &["db:migrate"]));
    script.push(
        Phase::AfterBundle,
        MutationOp::append("Procfile.dev", "worker: bin/jobs\n"),
    );
    script
}

#[test]
fn full_run_renders_templates_and_writes_marker() {
    let tree = Tree::default();
    let runner = Runner::default();

    let report = service(&tree, &runner)
        .run(&script(), &bindings(), RunOptions::default())
        .unwrap();

    assert_eq!(report.steps, 6);
    assert_eq!(report.commands, 2);
    assert_eq!(
        tree.get("README.md").as_deref(),
        Some("# MyBlog\n\nbin/rails server -p 4000\n")
    );
    assert_eq!(
        tree.get("Procfile.dev").as_deref(),
        Some("web: bin/rails server -p 4000\nworker: bin/jobs\n")
    );
    assert_eq!(
        *runner.seen.lock().unwrap(),
        vec!["bundle install", "bin/rails db:migrate"]
    );
    assert!(
        tree.get(MARKER_FILE)
            .unwrap()
            .contains(&report.run_id.to_string())
    );
}

#[test]
fn failed_command_aborts_and_keeps_earlier_writes() {
    let tree = Tree::default();
    let runner = Runner {
        exit_codes: HashMap::from([("bin/rails db:migrate".to_string(), 1)]),
        ..Runner::default()
    };

    let err = service(&tree, &runner)
        .run(&script(), &bindings(), RunOptions::default())
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(5));
    match err {
        RailsmithError::Application(ApplicationError::StepFailed { source, .. }) => {
            assert!(matches!(
                *source,
                RailsmithError::Application(ApplicationError::ExternalCommandFailed {
                    exit_code: 1,
                    ..
                })
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        tree.get("Procfile.dev").as_deref(),
        Some("web: bin/rails server -p 4000\n")
    );
    assert!(tree.get(MARKER_FILE).is_none());
}

#[test]
fn missing_binding_stops_before_writing_destination() {
    let tree = Tree::default();
    let mut script = GenerationScript::new();
    script.push(Phase::Main, Step::copy_template("README.md", "README.md"));

    let err = service(&tree, &Runner::default())
        .run(&script, &Bindings::new(), RunOptions::default())
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(1));
    assert!(tree.get("README.md").is_none());
}

#[test]
fn second_run_requires_force() {
    let tree = Tree::default();
    let runner = Runner::default();
    let service = service(&tree, &runner);
    let mut script = GenerationScript::new();
    script.push(Phase::Main, MutationOp::create(".overmind.env", "OVERMIND_PROCFILE=Procfile.dev\n"));

    service.run(&script, &bindings(), RunOptions::default()).unwrap();
    assert!(service.already_applied());

    let err = service
        .run(&script, &bindings(), RunOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RailsmithError::Application(ApplicationError::AlreadyApplied { .. })
    ));

    service
        .run(&script, &bindings(), RunOptions { force: true })
        .unwrap();
}

#[test]
fn plan_marks_replay_unsafe_steps() {
    let tree = Tree::default();
    let plan = service(&tree, &Runner::default()).plan(&script());

    let unsafe_kinds: Vec<_> = plan
        .iter()
        .filter(|s| !s.replay_safe)
        .map(|s| s.kind)
        .collect();
    assert_eq!(unsafe_kinds, vec!["run", "run", "append"]);
    assert_eq!(plan[3].phase, "bundle");
    assert_eq!(tree.writes(), 0);
}
