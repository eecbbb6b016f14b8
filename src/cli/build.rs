//! Build command implementation
//!
//! Discovers the Dockerfiles, validates them, runs the orchestrator and
//! reports every failure as it arrives.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::cli::output;
use crate::core::options::Settings;
use crate::core::orchestrator::{ManifestOutcome, Orchestrator, RunSummary};
use crate::core::unit::plan_units;
use crate::error::ArchbuildError;
use crate::infra::discovery::discover;
use crate::infra::docker::DockerCli;

/// Machine-readable run report
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    images: Vec<&'a str>,
    manifest_name: Option<&'a str>,
    summary: &'a RunSummary,
    errors: Vec<String>,
}

/// How the run is reported on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporting {
    /// Print a JSON report instead of the status line
    pub json: bool,
    /// Only errors are printed
    pub quiet: bool,
}

/// Execute a build run in `project_dir`
pub async fn execute(project_dir: &Path, settings: &Settings, reporting: Reporting) -> Result<()> {
    let definitions = discover(project_dir)
        .map_err(ArchbuildError::from)
        .with_context(|| format!("Failed to discover Dockerfiles in {}", project_dir.display()))?;

    // Invalid names abort before anything is built.
    let units = plan_units(&definitions, &settings.image_name, &settings.tag)
        .map_err(ArchbuildError::from)?;

    if units.is_empty() {
        if !reporting.quiet {
            output::notice(&format!("No Dockerfile found in {}", project_dir.display()));
        }
        return Ok(());
    }

    let invoker = DockerCli::locate(&settings.docker_binary, project_dir)
        .map_err(ArchbuildError::from)?;
    tracing::debug!("Using build tool {}", invoker.binary().display());

    tracing::info!(
        "Building {} image(s) for {}:{}",
        units.len(),
        settings.image_name,
        settings.tag
    );

    let orchestrator = Orchestrator::new(units, Arc::new(invoker), &settings.orchestrator_options());
    let images: Vec<String> = orchestrator
        .units()
        .iter()
        .map(|unit| unit.image().to_string())
        .collect();
    let manifest_name = orchestrator.manifest().map(|m| m.name().to_string());

    let mut handle = orchestrator.start();
    let mut errors = Vec::new();
    while let Some(err) = handle.next_error().await {
        output::display_build_error(&err);
        errors.push(err);
    }
    let report = handle.finish().await;
    for err in &report.errors {
        output::display_build_error(err);
    }
    errors.extend(report.errors);

    if report.summary.manifest == ManifestOutcome::Skipped && !reporting.quiet {
        if let Some(name) = &manifest_name {
            output::warning(&format!(
                "Manifest {name} was not created because some images failed (use --manifest-on-failure to override)"
            ));
        }
    }

    if reporting.json {
        let json_report = JsonReport {
            images: images.iter().map(String::as_str).collect(),
            manifest_name: manifest_name.as_deref(),
            summary: &report.summary,
            errors: errors.iter().map(ToString::to_string).collect(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&json_report).context("Failed to serialize report")?
        );
    }

    if !errors.is_empty() {
        return Err(ArchbuildError::RunFailed {
            failed: errors.len(),
        }
        .into());
    }

    if !reporting.json && !reporting.quiet {
        println!("{} Done", output::status::SUCCESS);
    }
    Ok(())
}
