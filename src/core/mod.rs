//! Core business logic module
//!
//! Everything that decides what to build and in which order. Processes
//! are only ever started through the [`invoker::Invoker`] seam; the real
//! implementation lives in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`arch`] - Supported architectures and platform tags
//! - [`command`] - Build tool command shapes
//! - [`invoker`] - Build tool invocation seam
//! - [`buildable`] - Build/push capability
//! - [`unit`] - Per-architecture image builds
//! - [`manifest`] - Multi-arch manifest assembly
//! - [`orchestrator`] - Parallel build orchestration
//! - [`global_config`] - Configuration file
//! - [`options`] - Settings resolution

pub mod arch;
pub mod buildable;
pub mod command;
pub mod global_config;
pub mod invoker;
pub mod manifest;
pub mod options;
pub mod orchestrator;
pub mod unit;
