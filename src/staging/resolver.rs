//! External package resolution.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Failure of the external package tool. The planner logs these and moves on.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Failed { program: String, code: Option<i32> },
}

/// Downloads every package listed in a requirements file into a directory.
pub trait PackageResolver {
    /// Returns the name of this resolver for logging.
    fn name(&self) -> &str;

    /// Resolve `requirements_file` into `output_dir`. Blocks until done.
    fn resolve(&self, requirements_file: &Path, output_dir: &Path) -> Result<(), ResolveError>;
}

/// `pip wheel -r <requirements> -w <output>`.
#[derive(Debug, Clone)]
pub struct PipWheel {
    program: String,
}

impl PipWheel {
    pub fn new() -> Self {
        Self {
            program: "pip".into(),
        }
    }

    /// Use a different pip executable (e.g. `pip3`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, requirements_file: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("wheel")
            .arg("-r")
            .arg(requirements_file)
            .arg("-w")
            .arg(output_dir);
        cmd
    }
}

impl Default for PipWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageResolver for PipWheel {
    fn name(&self) -> &str {
        &self.program
    }

    fn resolve(&self, requirements_file: &Path, output_dir: &Path) -> Result<(), ResolveError> {
        let mut cmd = self.command(requirements_file, output_dir);
        debug!("Running command: {:?}", cmd);

        let status = cmd.status().map_err(|source| ResolveError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ResolveError::Failed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}
