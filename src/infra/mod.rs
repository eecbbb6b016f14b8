//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem discovery and external processes.

pub mod dirs;
pub mod discovery;
pub mod docker;
