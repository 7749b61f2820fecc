//! Operator prompts.
//!
//! Uses `dialoguer` when built with the `interactive` feature and attached to
//! a terminal; otherwise reads one line from stdin.

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::debug;

use railsmith_core::domain::Port;

use crate::error::{CliError, CliResult, IntoCli};

const PORT_QUESTION: &str = "Default port for your app?";

/// Ask for the development server port.
///
/// Blank or unusable answers fall back to [`Port::DEFAULT`].
pub fn ask_port() -> CliResult<Port> {
    let answer = ask(PORT_QUESTION, &Port::DEFAULT.to_string())?;
    let port = Port::from_input(&answer);
    debug!(answer = %answer.trim(), %port, "port answered");
    Ok(port)
}

fn ask(question: &str, default: &str) -> CliResult<String> {
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        if let Some(answer) = ask_interactive(question, default)? {
            return Ok(answer);
        }
    }
    ask_line(question, default, &mut io::stdin().lock(), &mut io::stderr())
}

#[cfg(feature = "interactive")]
fn ask_interactive(question: &str, default: &str) -> CliResult<Option<String>> {
    dialoguer::Input::<String>::new()
        .with_prompt(question)
        .default(default.to_string())
        .show_default(true)
        .allow_empty(true)
        .interact_text()
        .map(Some)
        .map_err(|e| match e {
            dialoguer::Error::IO(err) if err.kind() == io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            other => CliError::InvalidInput {
                message: "failed to read answer".into(),
                source: Some(Box::new(other)),
            },
        })
}

#[cfg(not(feature = "interactive"))]
fn ask_interactive(_question: &str, _default: &str) -> CliResult<Option<String>> {
    Ok(None)
}

/// Plain fallback. End of input counts as a blank answer; bytes that are
/// not UTF-8 are replaced, so they parse as an invalid port.
fn ask_line(
    question: &str,
    default: &str,
    input: &mut dyn BufRead,
    prompt: &mut dyn Write,
) -> CliResult<String> {
    write!(prompt, "{question} ({default}) ").with_cli_context(|| "failed to write prompt")?;
    prompt.flush().with_cli_context(|| "failed to flush prompt")?;

    let mut raw = Vec::new();
    input
        .read_until(b'\n', &mut raw)
        .with_cli_context(|| "failed to read answer")?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: impl AsRef<[u8]>) -> Port {
        let mut reader = io::Cursor::new(input.as_ref().to_vec());
        let mut prompt = Vec::new();
        let line = ask_line(PORT_QUESTION, "3000", &mut reader, &mut prompt).unwrap();
        assert_eq!(String::from_utf8(prompt).unwrap(), "Default port for your app? (3000) ");
        Port::from_input(&line)
    }

    #[test]
    fn numeric_answer_is_used() {
        assert_eq!(answer("4000\n").get(), 4000);
    }

    #[test]
    fn blank_or_invalid_answers_fall_back() {
        for input in ["\n", "", "abc\n", "0\n", "-1\n", "70000\n"] {
            assert_eq!(answer(input), Port::DEFAULT, "input {input:?}");
        }
    }

    #[test]
    fn non_utf8_answer_falls_back() {
        assert_eq!(answer(b"\xff\xfe\n"), Port::DEFAULT);
        assert_eq!(answer(b"40\xff00\n"), Port::DEFAULT);
    }
}
