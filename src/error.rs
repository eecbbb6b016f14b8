//! Error types for archbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes, one per error class; success is 0
pub mod exit_code {
    /// A build, push or manifest step failed
    pub const BUILD: i32 = 1;
    /// Required configuration missing
    pub const USAGE: i32 = 2;
    /// Definition discovery failed
    pub const DISCOVERY: i32 = 3;
    /// A discovered definition has an invalid name
    pub const DEFINITION: i32 = 4;
    /// Configuration file could not be loaded
    pub const CONFIG: i32 = 5;
    /// The build tool binary could not be found
    pub const TOOL_NOT_FOUND: i32 = 6;
}

/// Build definition validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// Name does not split into exactly `prefix.arch`
    #[error("Malformed definition name '{definition}': expected two dot-separated components, found {components}")]
    MalformedName {
        definition: String,
        components: usize,
    },

    /// Architecture suffix not in the supported set
    #[error("Unsupported arch '{arch}' in '{definition}' (supported: arm32v7, arm64, amd64)")]
    UnsupportedArchitecture { definition: String, arch: String },
}

/// Errors reported by build, push and manifest steps
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The build tool ran and returned non-success
    #[error("{step} {target} failed: {diagnostic}")]
    CommandFailed {
        step: String,
        target: String,
        diagnostic: String,
    },

    /// The build tool could not be started
    #[error("{step} {target}: failed to run build tool: {error}")]
    Spawn {
        step: String,
        target: String,
        error: String,
    },

    /// A unit task terminated abnormally
    #[error("Task for {target} aborted: {error}")]
    TaskAborted { target: String, error: String },

    /// Build tool binary not found
    #[error("Build tool '{binary}' not found in PATH. Install Docker with the buildx plugin or pass --docker")]
    ToolNotFound { binary: String },
}

/// Definition discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Root directory does not exist
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Directory walk failed
    #[error("Failed to scan '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Command-line usage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// No image name from flags or config
    #[error("You have to pass an image name with --name (or set [image] name in the config file)")]
    MissingImageName,
}

/// Top-level archbuild error type
#[derive(Error, Debug)]
pub enum ArchbuildError {
    /// Definition error
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Build error
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Discovery error
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Usage error
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The run reported build failures
    #[error("{failed} step(s) failed")]
    RunFailed { failed: usize },
}

impl ArchbuildError {
    /// Exit code for this error class
    pub fn exit_code(&self) -> i32 {
        match self {
            ArchbuildError::Definition(_) => exit_code::DEFINITION,
            ArchbuildError::Build(BuildError::ToolNotFound { .. }) => exit_code::TOOL_NOT_FOUND,
            ArchbuildError::Build(_) | ArchbuildError::RunFailed { .. } => exit_code::BUILD,
            ArchbuildError::Discovery(_) => exit_code::DISCOVERY,
            ArchbuildError::Config(_) => exit_code::CONFIG,
            ArchbuildError::Usage(_) => exit_code::USAGE,
        }
    }
}

/// Map an error chain to its process exit code
///
/// Walks the `anyhow` chain looking for a classified error; anything
/// unclassified is reported as a build failure.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ArchbuildError>() {
            return e.exit_code();
        }
        if cause.downcast_ref::<DefinitionError>().is_some() {
            return exit_code::DEFINITION;
        }
        if let Some(e) = cause.downcast_ref::<BuildError>() {
            return ArchbuildError::Build(e.clone()).exit_code();
        }
        if cause.downcast_ref::<DiscoveryError>().is_some() {
            return exit_code::DISCOVERY;
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return exit_code::CONFIG;
        }
        if cause.downcast_ref::<UsageError>().is_some() {
            return exit_code::USAGE;
        }
    }
    exit_code::BUILD
}
