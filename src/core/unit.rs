//! Per-architecture image builds

use crate::config::defaults;
use crate::core::arch::Architecture;
use crate::core::buildable::Buildable;
use crate::core::command::DockerCommand;
use crate::core::invoker::{run_step, Invoker};
use crate::error::{BuildError, DefinitionError};

/// One architecture-specific image build
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildUnit {
    definition: String,
    architecture: Architecture,
    image: String,
}

impl BuildUnit {
    /// Create a build unit from a definition file name
    ///
    /// `definition` must be `{prefix}.{arch}` with `arch` one of the
    /// supported suffixes. The image reference becomes
    /// `{image_name}:{arch}-{tag}`.
    pub fn new(definition: &str, image_name: &str, tag: &str) -> Result<Self, DefinitionError> {
        let components: Vec<&str> = definition.split('.').collect();
        if components.len() != defaults::DEFINITION_COMPONENTS {
            return Err(DefinitionError::MalformedName {
                definition: definition.to_string(),
                components: components.len(),
            });
        }

        let suffix = components[1];
        let architecture = suffix.parse::<Architecture>().map_err(|_| {
            DefinitionError::UnsupportedArchitecture {
                definition: definition.to_string(),
                arch: suffix.to_string(),
            }
        })?;

        Ok(Self {
            definition: definition.to_string(),
            architecture,
            image: format!("{image_name}:{}-{tag}", architecture.suffix()),
        })
    }

    /// Path of the build definition, relative to the build context
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Target architecture
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Platform tag passed to buildx
    pub fn platform(&self) -> &'static str {
        self.architecture.platform()
    }

    /// Full image reference, `name:arch-tag`
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Command that builds this unit
    pub fn build_command(&self) -> DockerCommand {
        DockerCommand::Build {
            platform: self.platform().to_string(),
            definition: self.definition.clone(),
            image: self.image.clone(),
        }
    }

    /// Command that pushes this unit's image
    pub fn push_command(&self) -> DockerCommand {
        DockerCommand::PushImage {
            image: self.image.clone(),
        }
    }
}

/// Create one unit per definition, stopping at the first invalid name
pub fn plan_units(
    definitions: &[String],
    image_name: &str,
    tag: &str,
) -> Result<Vec<BuildUnit>, DefinitionError> {
    definitions
        .iter()
        .map(|definition| BuildUnit::new(definition, image_name, tag))
        .collect()
}

impl Buildable for BuildUnit {
    fn build(&self, invoker: &dyn Invoker) -> Result<(), BuildError> {
        run_step(invoker, &self.build_command())
    }

    fn push(&self, invoker: &dyn Invoker) -> Result<(), BuildError> {
        run_step(invoker, &self.push_command())
    }

    fn target(&self) -> &str {
        &self.definition
    }
}
