//! End-to-end tests for the `railsmith` binary.
//!
//! None of these run external commands: every `apply` here either stops
//! before the script starts or is a dry run.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command whose default config location is inside `home`.
fn railsmith(home: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("railsmith");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("RAILSMITH_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

/// The files `apply` checks for, plus enough for detection.
fn rails_app(parent: &Path, name: &str) -> std::path::PathBuf {
    let root = parent.join(name);
    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(
        root.join("Gemfile"),
        "source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 7.1.3\"\n",
    )
    .unwrap();
    fs::write(root.join(".ruby-version"), "ruby-3.3.1\n").unwrap();
    fs::write(
        root.join("config/application.rb"),
        "module Blog\n  class Application < Rails::Application\n  end\nend\n",
    )
    .unwrap();
    root
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("templates"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn apply_help_shows_options() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--skip-bundle"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn unknown_database_is_usage_error() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["apply", "blog", "--database", "oracle"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn templates_list_and_json() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["templates", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("solid_queue.yml.example"));

    let out = railsmith(home.path())
        .args(["templates", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_str())
        .collect();
    assert!(ids.contains(&"trix.css"));
}

#[test]
fn local_templates_shadow_builtin() {
    let home = TempDir::new().unwrap();
    let templates = home.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("README.md"), "# {{APP_NAME}}\n").unwrap();
    let config = home.path().join("railsmith.toml");
    fs::write(
        &config,
        format!("[templates]\nlocal_path = {:?}\n", templates.display().to_string()),
    )
    .unwrap();

    railsmith(home.path())
        .args(["--config", config.to_str().unwrap(), "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[local]"));
}

#[test]
fn apply_missing_directory_is_not_found() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["apply", "--yes"])
        .arg(home.path().join("absent"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("rails new"));
}

#[test]
fn apply_rejects_non_rails_directory() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("notes");
    fs::create_dir_all(&dir).unwrap();
    railsmith(home.path())
        .args(["apply", "--yes"])
        .arg(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Gemfile"));
}

#[test]
fn dry_run_prints_plan_without_writing() {
    let home = TempDir::new().unwrap();
    let app = rails_app(home.path(), "blog");
    let before = fs::read_to_string(app.join("Gemfile")).unwrap();

    railsmith(home.path())
        .args(["apply", "--dry-run", "--database", "postgresql"])
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains("create Procfile.dev"))
        .stdout(predicate::str::contains("run bundle install"))
        .stdout(predicate::str::contains("not safe to run twice"));

    assert_eq!(fs::read_to_string(app.join("Gemfile")).unwrap(), before);
    assert!(!app.join("Procfile.dev").exists());
    assert!(!app.join(".railsmith-applied").exists());
}

#[test]
fn dry_run_json_is_one_document() {
    let home = TempDir::new().unwrap();
    let app = rails_app(home.path(), "blog");

    let out = railsmith(home.path())
        .args(["--output-format", "json", "apply", "--dry-run", "--skip-bundle"])
        .arg(&app)
        .output()
        .unwrap();
    assert!(out.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let steps = plan.as_array().unwrap();
    assert_eq!(steps[0]["index"], 1);
    assert!(steps.iter().all(|s| s["phase"] != "bundle"));
    assert!(
        steps
            .iter()
            .any(|s| s["kind"] == "append" && s["replay_safe"] == false)
    );
}

#[test]
fn applied_marker_refuses_second_run() {
    let home = TempDir::new().unwrap();
    let app = rails_app(home.path(), "blog");
    fs::write(app.join(".railsmith-applied"), "run_id = \"x\"\n").unwrap();

    railsmith(home.path())
        .args(["apply", "--yes"])
        .arg(&app)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn config_path_and_get() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    railsmith(home.path())
        .args(["config", "get", "defaults.database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite"));

    railsmith(home.path())
        .args(["config", "get", "defaults.nope"])
        .assert()
        .code(4);
}

#[test]
fn environment_overrides_config() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .env("RAILSMITH_DEFAULTS__PORT", "4000")
        .args(["config", "get", "defaults.port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4000"));
}

#[test]
fn missing_explicit_config_is_config_error() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["--config"])
        .arg(home.path().join("absent.toml"))
        .arg("templates")
        .assert()
        .code(4);
}

#[test]
fn init_writes_config_once() {
    let home = TempDir::new().unwrap();
    railsmith(home.path()).arg("init").assert().success();

    railsmith(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    railsmith(home.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    railsmith(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("railsmith"));
}
