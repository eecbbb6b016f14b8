//! Default configuration values

/// Tag used when none is given on the command line or in config
pub const DEFAULT_TAG: &str = "latest";

/// Build tool binary
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// File name prefix that marks a build definition
pub const DEFINITION_PREFIX: &str = "Dockerfile.";

/// Number of dot-separated components in a definition name
pub const DEFINITION_COMPONENTS: usize = 2;

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "archbuild.toml";

/// Global config file name, under the config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
