//! Build settings resolution
//!
//! Merges command-line flags over the configuration file over built-in
//! defaults. Priority: CLI > config file > default.

use crate::config::defaults;
use crate::core::global_config::BuilderConfig;
use crate::core::orchestrator::{ManifestPolicy, OrchestratorOptions};
use crate::error::UsageError;

/// Values given on the command line
///
/// Boolean flags can only switch a feature on; `false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub manifest: bool,
    pub push: bool,
    pub manifest_on_failure: bool,
    pub docker: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub image_name: String,
    pub tag: String,
    pub manifest: bool,
    pub push: bool,
    pub manifest_policy: ManifestPolicy,
    pub docker_binary: String,
}

impl Settings {
    /// Resolve settings, failing if no image name is available
    pub fn resolve(cli: CliOverrides, config: &BuilderConfig) -> Result<Self, UsageError> {
        let image_name = cli
            .name
            .or_else(|| config.image.name.clone())
            .filter(|name| !name.trim().is_empty())
            .ok_or(UsageError::MissingImageName)?;

        let tag = cli
            .tag
            .or_else(|| config.image.tag.clone())
            .unwrap_or_else(|| defaults::DEFAULT_TAG.to_string());

        let manifest_policy = if cli.manifest_on_failure {
            ManifestPolicy::Always
        } else {
            config.manifest.on_partial_failure.unwrap_or_default()
        };

        Ok(Self {
            image_name,
            tag,
            manifest: cli.manifest || config.build.manifest.unwrap_or(false),
            push: cli.push || config.build.push.unwrap_or(false),
            manifest_policy,
            docker_binary: cli
                .docker
                .or_else(|| config.docker.binary.clone())
                .unwrap_or_else(|| defaults::DEFAULT_DOCKER_BINARY.to_string()),
        })
    }

    /// Orchestrator options derived from these settings
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            image_name: self.image_name.clone(),
            tag: self.tag.clone(),
            push: self.push,
            manifest: self.manifest,
            manifest_policy: self.manifest_policy,
        }
    }
}
