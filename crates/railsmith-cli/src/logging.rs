//! Tracing subscriber initialisation.
//!
//! Only the CLI installs a subscriber; `railsmith-core` and
//! `railsmith-adapters` only emit spans and events.
//!
//! Warnings are shown by default; each `-v` lowers the threshold one level
//! and `--quiet` keeps only errors. A set `RUST_LOG` wins over both.

use std::io::IsTerminal as _;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::{GlobalArgs, OutputFormat};

const CRATES: [&str; 3] = ["railsmith", "railsmith_core", "railsmith_adapters"];

/// Install the global subscriber. Logs always go to stderr so stdout stays
/// clean for `--output-format json`.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(threshold(args))));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if args.output_format == OutputFormat::Json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        let ansi = !args.no_color && std::io::stderr().is_terminal();
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("subscriber already installed: {e}"))
}

/// One directive per workspace crate so dependencies stay at their default.
fn directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    CRATES.map(|krate| format!("{krate}={level}")).join(",")
}

fn threshold(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
