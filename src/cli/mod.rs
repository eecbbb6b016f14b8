//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod build;
pub mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::core::global_config::BuilderConfig;
use crate::core::options::{CliOverrides, Settings};
use crate::infra::dirs::ArchbuildDirs;

const LONG_ABOUT: &str = "\
Build an image for each Dockerfile present in the folder.

Images are named name:architecture-tag. With --manifest, a manifest name:tag
referencing every built image is created after all builds finish.";

/// Shown by both `-h` and `--help`
const ARCHITECTURES_HELP: &str = "\
Dockerfiles are in the Dockerfile.architecture format, where architecture is one of:
- arm32v7
- arm64
- amd64";

/// Archbuild - parallel multi-architecture Docker image builder
#[derive(Parser, Debug)]
#[command(name = "archbuild")]
#[command(author, version, about, long_about = LONG_ABOUT, after_help = ARCHITECTURES_HELP)]
pub struct Cli {
    /// Base name of the images; images are generated as name:arch-tag
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tag appended to the image names [default: latest]
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Create a manifest including all the built images
    #[arg(short, long)]
    pub manifest: bool,

    /// Push the images after building them; the manifest is pushed too
    #[arg(short, long)]
    pub push: bool,

    /// Create the manifest even when some image failed to build
    #[arg(long)]
    pub manifest_on_failure: bool,

    /// Directory containing the Dockerfiles (also the build context)
    #[arg(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,

    /// Build tool binary
    #[arg(long, env = "ARCHBUILD_DOCKER")]
    pub docker: Option<String>,

    /// Configuration file [default: ./archbuild.toml, then the global config]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the build run
    pub async fn run(self) -> Result<()> {
        let config = BuilderConfig::load(self.config.as_deref(), &self.dir, &ArchbuildDirs::new())
            .context("Failed to load configuration")?;

        let overrides = CliOverrides {
            name: self.name,
            tag: self.tag,
            manifest: self.manifest,
            push: self.push,
            manifest_on_failure: self.manifest_on_failure,
            docker: self.docker,
        };
        let settings = Settings::resolve(overrides, &config)?;

        let report = build::Reporting {
            json: self.json,
            quiet: self.quiet,
        };
        build::execute(&self.dir, &settings, report).await
    }

    /// Default log filter for the requested verbosity
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "archbuild=info",
            1 => "archbuild=debug",
            _ => "archbuild=trace",
        }
    }
}
