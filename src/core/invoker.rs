//! Build tool invocation seam
//!
//! The orchestration logic never spawns processes itself; it goes
//! through an [`Invoker`]. The real implementation lives in
//! [`crate::infra::docker`], tests substitute a scripted fake.

use std::io;

use crate::core::command::DockerCommand;
use crate::error::BuildError;

/// Captured result of one build tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output content
    pub stdout: Vec<u8>,
    /// Standard error content
    pub stderr: Vec<u8>,
    /// Whether the tool reported success
    pub success: bool,
}

impl CommandOutput {
    /// Successful output with no content
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Failed output with the given error stream
    pub fn failed(stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    /// Diagnostic text for a failure
    ///
    /// Prefers the error stream; falls back to standard output when the
    /// error stream is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        if stderr.trim().is_empty() {
            String::from_utf8_lossy(&self.stdout).trim().to_string()
        } else {
            stderr.trim().to_string()
        }
    }
}

/// Runs build tool commands
///
/// Implementations block until the command finishes. They are shared
/// across unit tasks, hence `Send + Sync`.
pub trait Invoker: Send + Sync {
    /// Run the build tool with the given arguments
    fn invoke(&self, args: &[String]) -> io::Result<CommandOutput>;
}

/// Run one command through the invoker, mapping failure to [`BuildError`]
pub fn run_step(invoker: &dyn Invoker, command: &DockerCommand) -> Result<(), BuildError> {
    let label = command.label();
    let target = command.target();

    tracing::info!("{label} {target}");
    tracing::debug!("docker {command}");

    let output = invoker
        .invoke(&command.args())
        .map_err(|e| BuildError::Spawn {
            step: label.to_string(),
            target: target.to_string(),
            error: e.to_string(),
        })?;

    if !output.success {
        return Err(BuildError::CommandFailed {
            step: label.to_string(),
            target: target.to_string(),
            diagnostic: output.diagnostic(),
        });
    }

    tracing::info!("{label} {target}: done");
    Ok(())
}
