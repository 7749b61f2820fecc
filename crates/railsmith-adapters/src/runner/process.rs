//! Runs external commands with `std::process::Command`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use railsmith_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::CommandSpec,
    error::RailsmithResult,
};

/// Production runner. Blocks until the child exits.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Discard the child's stdout/stderr instead of inheriting them.
    quiet: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %command))]
    fn run(&self, command: &CommandSpec, root: &Path) -> RailsmithResult<i32> {
        let dir = match &command.dir {
            Some(sub) => root.join(sub),
            None => root.to_path_buf(),
        };

        let mut child = Command::new(&command.program);
        child.args(&command.args).current_dir(&dir).stdin(Stdio::null());
        if self.quiet {
            child.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = child
            .status()
            .map_err(|e| ApplicationError::CommandSpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        // Killed by a signal: no exit code.
        let code = status.code().unwrap_or(-1);
        if code == 0 {
            debug!(dir = %dir.display(), "command succeeded");
        } else {
            warn!(exit_code = code, "command exited non-zero");
        }
        Ok(code)
    }
}
