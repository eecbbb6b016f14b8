//! Build capability shared by image builds and manifests

use crate::core::invoker::Invoker;
use crate::error::BuildError;

/// Anything that can be built and then pushed through the build tool
pub trait Buildable: Send + Sync {
    /// Build the artifact
    fn build(&self, invoker: &dyn Invoker) -> Result<(), BuildError>;

    /// Push the built artifact to its registry
    fn push(&self, invoker: &dyn Invoker) -> Result<(), BuildError>;

    /// Short name used in logs and task errors
    fn target(&self) -> &str;
}

/// Build, then push if requested
///
/// Push never runs after a failed build.
pub fn build_and_push(
    buildable: &dyn Buildable,
    invoker: &dyn Invoker,
    push: bool,
) -> Result<(), BuildError> {
    buildable.build(invoker)?;
    if push {
        buildable.push(invoker)?;
    }
    Ok(())
}
