//! Multi-architecture manifest assembly

use std::sync::Arc;

use crate::core::buildable::Buildable;
use crate::core::command::DockerCommand;
use crate::core::invoker::{run_step, Invoker};
use crate::core::unit::BuildUnit;
use crate::error::BuildError;

/// The manifest list that ties per-architecture images together
///
/// Shares its member units with the orchestrator rather than copying them.
#[derive(Debug, Clone)]
pub struct ManifestUnit {
    name: String,
    members: Vec<Arc<BuildUnit>>,
}

impl ManifestUnit {
    /// Create a manifest named `{image_name}:{tag}`
    pub fn new(image_name: &str, tag: &str, members: Vec<Arc<BuildUnit>>) -> Self {
        Self {
            name: format!("{image_name}:{tag}"),
            members,
        }
    }

    /// Manifest name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member builds, in amend order
    pub fn members(&self) -> &[Arc<BuildUnit>] {
        &self.members
    }

    pub fn create_command(&self) -> DockerCommand {
        DockerCommand::CreateManifest {
            name: self.name.clone(),
            images: self
                .members
                .iter()
                .map(|unit| unit.image().to_string())
                .collect(),
        }
    }

    pub fn push_command(&self) -> DockerCommand {
        DockerCommand::PushManifest {
            name: self.name.clone(),
        }
    }
}

impl Buildable for ManifestUnit {
    fn build(&self, invoker: &dyn Invoker) -> Result<(), BuildError> {
        if self.members.is_empty() {
            tracing::warn!("Manifest {} references no images", self.name);
        }
        run_step(invoker, &self.create_command())
    }

    fn push(&self, invoker: &dyn Invoker) -> Result<(), BuildError> {
        run_step(invoker, &self.push_command())
    }

    fn target(&self) -> &str {
        &self.name
    }
}
