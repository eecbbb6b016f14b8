//! Configuration file handling
//!
//! Reads optional defaults from `archbuild.toml` in the project directory
//! or `config.toml` in the global config directory. Command-line flags
//! always win over anything set here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults::PROJECT_CONFIG_FILE;
use crate::core::orchestrator::ManifestPolicy;
use crate::error::ConfigError;
use crate::infra::dirs::ArchbuildDirs;

/// Builder configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// Image naming
    #[serde(default)]
    pub image: ImageConfig,

    /// Build defaults
    #[serde(default)]
    pub build: BuildConfig,

    /// Manifest behaviour
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Build tool settings
    #[serde(default)]
    pub docker: DockerConfig,
}

/// Image naming
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Base image name
    pub name: Option<String>,

    /// Image tag
    pub tag: Option<String>,
}

/// Build defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Push images after building
    pub push: Option<bool>,

    /// Create a manifest over all images
    pub manifest: Option<bool>,
}

/// Manifest behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    /// `"skip"` or `"build"` when some image failed
    pub on_partial_failure: Option<ManifestPolicy>,
}

/// Build tool settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerConfig {
    /// Binary name or path
    pub binary: Option<String>,
}

impl BuilderConfig {
    /// Load configuration for a project
    ///
    /// An explicit path must exist. Otherwise the project file is tried,
    /// then the global one; if neither exists the defaults are returned.
    pub fn load(
        explicit: Option<&Path>,
        project_dir: &Path,
        dirs: &ArchbuildDirs,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    error: "file does not exist".to_string(),
                });
            }
            return Self::load_from_path(path);
        }

        for candidate in Self::candidates(project_dir, dirs) {
            if candidate.exists() {
                tracing::debug!("Loading config from {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Config file locations in lookup order
    pub fn candidates(project_dir: &Path, dirs: &ArchbuildDirs) -> Vec<PathBuf> {
        vec![
            project_dir.join(PROJECT_CONFIG_FILE),
            dirs.global_config_path(),
        ]
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}
