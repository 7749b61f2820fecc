//! Records commands instead of running them, for tests.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use tracing::debug;

use railsmith_core::{
    application::ports::CommandRunner, domain::CommandSpec, error::RailsmithResult,
};

#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    log: Vec<String>,
    exit_codes: HashMap<String, i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the command whose display form is `line` exit with `code`.
    pub fn fail_on(self, line: &str, code: i32) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.exit_codes.insert(line.to_string(), code);
        }
        self
    }

    /// Every command line seen so far, in order. Commands with a working
    /// directory are prefixed with `(dir) `.
    pub fn commands(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.log.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec, _root: &Path) -> RailsmithResult<i32> {
        let line = command.to_string();
        let entry = match &command.dir {
            Some(dir) => format!("({dir}) {line}"),
            None => line.clone(),
        };
        debug!(command = %entry, "recorded command");

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.log.push(entry);
        Ok(inner.exit_codes.get(&line).copied().unwrap_or(0))
    }
}
