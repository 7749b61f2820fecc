//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::{
    cli::{Cli, CompletionsArgs, Shell},
    error::CliResult,
};

const BIN_NAME: &str = "railsmith";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    match args.shell {
        Shell::Bash => write(shells::Bash),
        Shell::Zsh => write(shells::Zsh),
        Shell::Fish => write(shells::Fish),
        Shell::PowerShell => write(shells::PowerShell),
        Shell::Elvish => write(shells::Elvish),
    }
    Ok(())
}

fn write(generator: impl Generator) {
    let mut cmd = Cli::command();
    generate(generator, &mut cmd, BIN_NAME, &mut std::io::stdout());
}
