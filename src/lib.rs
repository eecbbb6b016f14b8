//! Archbuild - parallel multi-architecture Docker image builder
//!
//! Builds one image per `Dockerfile.<arch>` in a directory, all at the same
//! time, optionally pushes them, and assembles a multi-arch manifest once
//! every build has finished.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Build units, manifests and the orchestrator (no process spawning)
//! - [`infra`] - Infrastructure layer (filesystem discovery, docker processes)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and exit codes

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
