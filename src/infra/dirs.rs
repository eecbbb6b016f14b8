//! Platform-specific directory management
//!
//! Locates the global configuration directory. `ARCHBUILD_CONFIG_DIR`
//! overrides the platform default (`$XDG_CONFIG_HOME/archbuild` on Linux,
//! `~/Library/Application Support/archbuild` on macOS).

use std::env;
use std::path::PathBuf;

use crate::config::defaults::GLOBAL_CONFIG_FILE;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "ARCHBUILD_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "archbuild";

/// Platform-specific directory provider for archbuild
#[derive(Debug, Clone)]
pub struct ArchbuildDirs {
    config_dir: PathBuf,
}

impl ArchbuildDirs {
    /// Resolve directories from the environment, then platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Get the config directory path
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for ArchbuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
