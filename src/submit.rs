//! Hand-off to the job submission tool.

use std::process::Command;

use thiserror::Error;

/// Errors starting the submission tool. Its exit status is not an error.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("No command to run")]
    Empty,

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A fully composed submission: slot 0 is the program, the rest its arguments.
#[derive(Debug, Clone)]
pub struct Submission {
    args: Vec<String>,
}

impl Submission {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Shell-style rendering for logs and dry runs.
    pub fn command_line(&self) -> String {
        self.args
            .iter()
            .map(|arg| quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command with inherited stdio and wait for it.
    ///
    /// Returns the child's exit code, or 1 if it was killed by a signal.
    pub fn run(&self) -> Result<i32, SubmitError> {
        let (program, rest) = self.args.split_first().ok_or(SubmitError::Empty)?;

        let status = Command::new(program)
            .args(rest)
            .status()
            .map_err(|source| SubmitError::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(status.code().unwrap_or(1))
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./,=:@%+#[]".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
