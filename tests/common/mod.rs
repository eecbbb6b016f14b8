//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory holding Dockerfiles and, on unix, a fake
/// `docker` script that appends every invocation to `docker.log`.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Separate directory for the fake build tool and its log
    pub tool_dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            tool_dir: TempDir::new().expect("Failed to create tool directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create one Dockerfile per given name
    pub fn create_dockerfiles(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, "FROM scratch\n");
        }
    }

    /// Path to the fake docker log
    pub fn docker_log(&self) -> PathBuf {
        self.tool_dir.path().join("docker.log")
    }

    /// Lines recorded by the fake docker, in invocation order
    pub fn docker_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.docker_log())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Install a fake docker that fails any call containing `fail_pattern`
    #[cfg(unix)]
    pub fn install_fake_docker(&self, fail_pattern: Option<&str>) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let failure = fail_pattern.map_or(String::new(), |pattern| {
            format!(
                "case \"$*\" in\n  *\"{pattern}\"*) echo \"simulated failure: $*\" >&2; exit 1;;\nesac\n"
            )
        });
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> \"{}\"\n{failure}exit 0\n",
            self.docker_log().display()
        );

        let path = self.tool_dir.path().join("docker");
        std::fs::write(&path, script).expect("Failed to write fake docker");
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat fake docker")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod fake docker");
        path
    }

    /// Run archbuild in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_archbuild"));
        cmd.current_dir(self.path());
        cmd.env_remove("ARCHBUILD_DOCKER");
        cmd.env("ARCHBUILD_CONFIG_DIR", self.tool_dir.path().join("config"));
        cmd.env_remove("RUST_LOG");
        for arg in args {
            cmd.arg(arg);
        }
        cmd.output().expect("Failed to execute archbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished process
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr of a finished process
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
