//! Build orchestration
//!
//! Runs every [`BuildUnit`] on its own blocking task, waits for all of them
//! at a barrier, then runs the optional [`ManifestUnit`] step. Every failure
//! is written to an error sink that closes once no further write can occur.
//!
//! ```text
//! Idle -> Building -> ManifestPending -> Closed
//!                  \-> Done ----------/
//! ```

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinHandle, JoinSet};

use crate::core::buildable::{build_and_push, Buildable};
use crate::core::invoker::Invoker;
use crate::core::manifest::ManifestUnit;
use crate::core::unit::BuildUnit;
use crate::error::BuildError;

/// What to do with the manifest when some unit failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestPolicy {
    /// Skip the manifest step unless every unit succeeded
    #[default]
    #[serde(rename = "skip")]
    RequireAllBuilds,
    /// Run the manifest step regardless of unit failures
    #[serde(rename = "build")]
    Always,
}

/// Result of the manifest step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestOutcome {
    /// No manifest was configured
    #[default]
    NotRequested,
    /// Configured but not run
    Skipped,
    /// Created, not pushed
    Created,
    /// Created and pushed
    Pushed,
    /// Creation or push failed
    Failed,
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Units scheduled
    pub units: usize,
    /// Units whose build (and push, if enabled) succeeded
    pub succeeded: usize,
    /// Units that reported an error
    pub failed: usize,
    /// Units whose image was pushed
    pub pushed: usize,
    /// Manifest step result
    pub manifest: ManifestOutcome,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Every error written to the sink, in arrival order
    pub errors: Vec<BuildError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Base image name
    pub image_name: String,
    /// Image tag
    pub tag: String,
    /// Push images (and the manifest) after building
    pub push: bool,
    /// Create a manifest over all units
    pub manifest: bool,
    /// Manifest behaviour after unit failures
    pub manifest_policy: ManifestPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Building,
    ManifestPending,
    Done,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitOutcome {
    Built,
    Pushed,
    Failed,
}

/// Drives one build run
pub struct Orchestrator {
    units: Vec<Arc<BuildUnit>>,
    manifest: Option<ManifestUnit>,
    push: bool,
    manifest_policy: ManifestPolicy,
    invoker: Arc<dyn Invoker>,
    state: State,
}

impl Orchestrator {
    /// Create an orchestrator over `units`
    ///
    /// When a manifest is requested it is named `{image_name}:{tag}` and
    /// shares the units in their given order.
    pub fn new(
        units: Vec<BuildUnit>,
        invoker: Arc<dyn Invoker>,
        options: &OrchestratorOptions,
    ) -> Self {
        let units: Vec<Arc<BuildUnit>> = units.into_iter().map(Arc::new).collect();
        let manifest = options
            .manifest
            .then(|| ManifestUnit::new(&options.image_name, &options.tag, units.clone()));

        Self {
            units,
            manifest,
            push: options.push,
            manifest_policy: options.manifest_policy,
            invoker,
            state: State::Idle,
        }
    }

    pub fn units(&self) -> &[Arc<BuildUnit>] {
        &self.units
    }

    pub fn manifest(&self) -> Option<&ManifestUnit> {
        self.manifest.as_ref()
    }

    /// Start the run in the background
    ///
    /// Must be called from within a Tokio runtime. Errors arrive on the
    /// returned handle as they happen.
    pub fn start(self) -> RunHandle {
        // One slot per unit plus one for the manifest: no writer ever waits.
        let (sink, errors) = mpsc::channel(self.units.len() + 1);
        let driver = tokio::spawn(self.drive(sink));
        RunHandle { errors, driver }
    }

    /// Run to completion and collect every error
    pub async fn run(self) -> RunReport {
        self.start().finish().await
    }

    fn transition(&mut self, next: State) {
        tracing::debug!(from = ?self.state, to = ?next, "orchestrator state");
        self.state = next;
    }

    async fn drive(mut self, sink: mpsc::Sender<BuildError>) -> RunSummary {
        let mut summary = RunSummary {
            units: self.units.len(),
            ..RunSummary::default()
        };

        if self.units.is_empty() {
            tracing::info!("No Dockerfile found");
            if self.manifest.is_some() {
                summary.manifest = ManifestOutcome::Skipped;
            }
            self.transition(State::Closed);
            return summary;
        }

        self.transition(State::Building);
        let mut tasks = JoinSet::new();
        let mut targets = HashMap::with_capacity(self.units.len());
        for unit in &self.units {
            let target = unit.definition().to_string();
            let unit = Arc::clone(unit);
            let invoker = Arc::clone(&self.invoker);
            let sink = sink.clone();
            let push = self.push;
            let task = tasks.spawn_blocking(move || run_unit(&unit, invoker.as_ref(), push, &sink));
            targets.insert(task.id(), target);
        }

        // Barrier: nothing below runs until every unit task has terminated.
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, UnitOutcome::Pushed)) => {
                    summary.succeeded += 1;
                    summary.pushed += 1;
                }
                Ok((_, UnitOutcome::Built)) => summary.succeeded += 1,
                Ok((_, UnitOutcome::Failed)) => summary.failed += 1,
                Err(e) => {
                    summary.failed += 1;
                    report_async(&sink, unit_task_aborted(&targets, &e)).await;
                }
            }
        }
        tracing::debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "all unit tasks finished"
        );

        if let Some(manifest) = self.manifest.take() {
            if summary.failed > 0 && self.manifest_policy == ManifestPolicy::RequireAllBuilds {
                tracing::warn!(
                    "Skipping manifest {}: {} build(s) failed",
                    manifest.name(),
                    summary.failed
                );
                summary.manifest = ManifestOutcome::Skipped;
                self.transition(State::Done);
            } else {
                self.transition(State::ManifestPending);
                summary.manifest = self.run_manifest(manifest, &sink).await;
            }
        } else {
            self.transition(State::Done);
        }

        drop(sink);
        self.transition(State::Closed);
        summary
    }

    async fn run_manifest(
        &self,
        manifest: ManifestUnit,
        sink: &mpsc::Sender<BuildError>,
    ) -> ManifestOutcome {
        let invoker = Arc::clone(&self.invoker);
        let push = self.push;
        let target = manifest.name().to_string();

        let joined = tokio::task::spawn_blocking(move || {
            guarded(&manifest, || build_and_push(&manifest, invoker.as_ref(), push))
        })
        .await;

        let result = joined.unwrap_or_else(|e| {
            Err(BuildError::TaskAborted {
                target,
                error: e.to_string(),
            })
        });

        match result {
            Ok(()) if push => ManifestOutcome::Pushed,
            Ok(()) => ManifestOutcome::Created,
            Err(err) => {
                report_async(sink, err).await;
                ManifestOutcome::Failed
            }
        }
    }
}

/// Handle on a running orchestration
pub struct RunHandle {
    errors: mpsc::Receiver<BuildError>,
    driver: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Next error from the sink, or `None` once the run has completed
    pub async fn next_error(&mut self) -> Option<BuildError> {
        self.errors.recv().await
    }

    /// Drain the remaining errors and wait for the run to finish
    pub async fn finish(mut self) -> RunReport {
        let mut errors = Vec::new();
        while let Some(err) = self.errors.recv().await {
            errors.push(err);
        }

        let summary = match self.driver.await {
            Ok(summary) => summary,
            Err(e) => {
                errors.push(BuildError::TaskAborted {
                    target: "orchestrator".to_string(),
                    error: e.to_string(),
                });
                RunSummary::default()
            }
        };

        RunReport { summary, errors }
    }
}

fn run_unit(
    unit: &BuildUnit,
    invoker: &dyn Invoker,
    push: bool,
    sink: &mpsc::Sender<BuildError>,
) -> UnitOutcome {
    match guarded(unit, || build_and_push(unit, invoker, push)) {
        Ok(()) if push => UnitOutcome::Pushed,
        Ok(()) => UnitOutcome::Built,
        Err(err) => {
            report_blocking(sink, err);
            UnitOutcome::Failed
        }
    }
}

/// Turn a panic inside a step into a [`BuildError::TaskAborted`]
fn guarded(
    buildable: &dyn Buildable,
    step: impl FnOnce() -> Result<(), BuildError>,
) -> Result<(), BuildError> {
    panic::catch_unwind(AssertUnwindSafe(step)).unwrap_or_else(|payload| {
        let error = payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
            .unwrap_or_else(|| "panicked".to_string());
        Err(BuildError::TaskAborted {
            target: buildable.target().to_string(),
            error,
        })
    })
}

/// Error for a unit task that terminated without reporting an outcome
fn unit_task_aborted(targets: &HashMap<Id, String>, err: &JoinError) -> BuildError {
    BuildError::TaskAborted {
        target: targets
            .get(&err.id())
            .cloned()
            .unwrap_or_else(|| "unit task".to_string()),
        error: err.to_string(),
    }
}

fn report_blocking(sink: &mpsc::Sender<BuildError>, err: BuildError) {
    tracing::debug!("reporting: {err}");
    if let Err(closed) = sink.blocking_send(err) {
        tracing::debug!("error sink abandoned, dropping: {}", closed.0);
    }
}

async fn report_async(sink: &mpsc::Sender<BuildError>, err: BuildError) {
    tracing::debug!("reporting: {err}");
    if let Err(closed) = sink.send(err).await {
        tracing::debug!("error sink abandoned, dropping: {}", closed.0);
    }
}
