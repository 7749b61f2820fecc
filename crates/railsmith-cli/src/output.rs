//! Everything a command prints for the operator.
//!
//! Human output goes to stdout through [`OutputManager`]. In JSON mode every
//! human line is dropped and a command prints exactly one document with
//! [`OutputManager::json`].

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => match config.output.format.as_str() {
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Auto,
            },
            other => other,
        };
        // Auto resolves to Human on a TTY, Plain when piped.
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    /// Write one line, styled by `paint` unless colour is off.
    fn line(&self, text: &str, paint: impl FnOnce(&str) -> String) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        if self.no_color {
            self.term.write_line(text)
        } else {
            self.term.write_line(&paint(text))
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(msg, str::to_owned)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.line(&format!("\u{2713} {msg}"), |l| l.green().to_string())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.line(&format!("\u{26a0} {msg}"), |l| l.yellow().to_string())
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.line(&format!("\u{2139} {msg}"), |l| l.blue().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.line(text, |l| l.cyan().bold().to_string())
    }

    /// One step of a run, as a right-aligned verb and its target:
    /// `      create  Procfile.dev`.
    pub fn status(&self, verb: &str, target: &str) -> io::Result<()> {
        let verb = format!("{verb:>12}");
        let width = verb.len();
        self.line(&format!("{verb}  {target}"), |l| {
            let (verb, rest) = l.split_at(width);
            format!("{}{rest}", verb.green().bold())
        })
    }

    /// Print `value` as pretty JSON. Only does anything in JSON mode.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        if self.resolved_format != OutputFormat::Json {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value).map_err(|e| CliError::InvalidInput {
            message: format!("cannot serialise output: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// A spinner on stderr, or `None` when output is not an interactive
    /// human terminal.
    pub fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.spinner_enabled() {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {elapsed:>4} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    }

    pub fn spinner_enabled(&self) -> bool {
        !self.silent() && self.resolved_format == OutputFormat::Human && io::stderr().is_terminal()
    }

    /// Human, Plain or Json; never Auto.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: false,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.silent());
    }

    #[test]
    fn plain_and_json_never_colour() {
        assert!(make_manager(false, OutputFormat::Plain).no_color);
        assert!(make_manager(false, OutputFormat::Json).no_color);
        assert!(!make_manager(false, OutputFormat::Human).no_color);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Auto,
        };
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        assert_eq!(OutputManager::new(&args, &config).format(), OutputFormat::Json);
    }

    #[test]
    fn no_spinner_outside_human_mode() {
        assert!(make_manager(false, OutputFormat::Plain).spinner("x".into()).is_none());
        assert!(make_manager(true, OutputFormat::Human).spinner("x".into()).is_none());
    }

    #[test]
    fn json_is_noop_in_plain_mode() {
        let out = make_manager(false, OutputFormat::Plain);
        assert!(out.json(&serde_json::json!({"a": 1})).is_ok());
    }
}
