//! Docker CLI invoker
//!
//! Runs the `docker` binary as a child process and captures its output.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::invoker::{CommandOutput, Invoker};
use crate::error::BuildError;

/// [`Invoker`] backed by a local `docker` binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// Resolved path to the binary
    binary: PathBuf,
    /// Working directory, which is also the build context
    workdir: PathBuf,
}

impl DockerCli {
    /// Resolve `binary` on `PATH` (or as a path) and run commands in `workdir`
    pub fn locate(binary: &str, workdir: &Path) -> Result<Self, BuildError> {
        let resolved = which::which(binary).map_err(|_| BuildError::ToolNotFound {
            binary: binary.to_string(),
        })?;
        Ok(Self {
            binary: resolved,
            workdir: workdir.to_path_buf(),
        })
    }

    /// Path to the resolved binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Invoker for DockerCli {
    fn invoke(&self, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
        })
    }
}
