//! Build tool command shapes
//!
//! The four `docker` invocations the builder issues. Flag spelling and
//! ordering follow the docker CLI contract and must not change.

use std::fmt;

/// A single invocation of the build tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerCommand {
    /// `buildx build --platform {platform} --rm -f {definition} -t {image} .`
    Build {
        platform: String,
        definition: String,
        image: String,
    },
    /// `push {image}`
    PushImage { image: String },
    /// `manifest create {name} --amend {image}...`
    CreateManifest { name: String, images: Vec<String> },
    /// `manifest push {name} -p`
    PushManifest { name: String },
}

impl DockerCommand {
    /// Argument vector passed to the build tool binary
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            DockerCommand::Build {
                platform,
                definition,
                image,
            } => {
                args.extend(["buildx", "build", "--platform"].map(String::from));
                args.push(platform.clone());
                args.extend(["--rm", "-f"].map(String::from));
                args.push(definition.clone());
                args.push("-t".to_string());
                args.push(image.clone());
                args.push(".".to_string());
            }
            DockerCommand::PushImage { image } => {
                args.push("push".to_string());
                args.push(image.clone());
            }
            DockerCommand::CreateManifest { name, images } => {
                args.extend(["manifest", "create"].map(String::from));
                args.push(name.clone());
                for image in images {
                    args.push("--amend".to_string());
                    args.push(image.clone());
                }
            }
            DockerCommand::PushManifest { name } => {
                args.extend(["manifest", "push"].map(String::from));
                args.push(name.clone());
                args.push("-p".to_string());
            }
        }
        args
    }

    /// Step label used in logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            DockerCommand::Build { .. } => "Building",
            DockerCommand::PushImage { .. } => "Pushing",
            DockerCommand::CreateManifest { .. } => "Building manifest",
            DockerCommand::PushManifest { .. } => "Pushing manifest",
        }
    }

    /// What the step operates on: the definition for builds, otherwise the image or manifest name
    pub fn target(&self) -> &str {
        match self {
            DockerCommand::Build { definition, .. } => definition.as_str(),
            DockerCommand::PushImage { image } => image.as_str(),
            DockerCommand::CreateManifest { name, .. } | DockerCommand::PushManifest { name } => {
                name.as_str()
            }
        }
    }
}

impl fmt::Display for DockerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Split a command line the way the docker CLI receives it
    fn split(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_build_command_shape() {
        let cmd = DockerCommand::Build {
            platform: "linux/arm/v7".to_string(),
            definition: "Dockerfile.arm32v7".to_string(),
            image: "myapp:arm32v7-latest".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "buildx build --platform linux/arm/v7 --rm -f Dockerfile.arm32v7 -t myapp:arm32v7-latest ."
        );
        assert_eq!(cmd.args(), split(&cmd.to_string()));
    }

    #[test]
    fn test_push_image_command_shape() {
        let cmd = DockerCommand::PushImage {
            image: "myapp:amd64-v1".to_string(),
        };
        assert_eq!(cmd.args(), vec!["push", "myapp:amd64-v1"]);
    }

    #[test]
    fn test_create_manifest_amends_in_order() {
        let cmd = DockerCommand::CreateManifest {
            name: "myapp:v1".to_string(),
            images: vec!["myapp:amd64-v1".to_string(), "myapp:arm64-v1".to_string()],
        };
        assert_eq!(
            cmd.to_string(),
            "manifest create myapp:v1 --amend myapp:amd64-v1 --amend myapp:arm64-v1"
        );
    }

    #[test]
    fn test_create_manifest_without_members() {
        let cmd = DockerCommand::CreateManifest {
            name: "myapp:v1".to_string(),
            images: Vec::new(),
        };
        assert_eq!(cmd.args(), vec!["manifest", "create", "myapp:v1"]);
    }

    #[test]
    fn test_push_manifest_purges() {
        let cmd = DockerCommand::PushManifest {
            name: "myapp:v1".to_string(),
        };
        assert_eq!(cmd.to_string(), "manifest push myapp:v1 -p");
    }

    #[test]
    fn test_labels_and_targets() {
        let build = DockerCommand::Build {
            platform: "linux/amd64".to_string(),
            definition: "Dockerfile.amd64".to_string(),
            image: "myapp:amd64-latest".to_string(),
        };
        assert_eq!(build.label(), "Building");
        assert_eq!(build.target(), "Dockerfile.amd64");

        let push = DockerCommand::PushManifest {
            name: "myapp:latest".to_string(),
        };
        assert_eq!(push.label(), "Pushing manifest");
        assert_eq!(push.target(), "myapp:latest");
    }
}
