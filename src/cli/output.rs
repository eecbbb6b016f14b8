//! Output formatting
//!
//! Status prefixes and error display for the command line.

use crate::error::BuildError;

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Print an error chain to stderr
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} Error: {err}", status::ERROR);
    for cause in err.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}

/// Print a single step failure as it arrives from the run
pub fn display_build_error(err: &BuildError) {
    eprintln!("{} {err}", status::ERROR);
}

/// Print an informational notice
pub fn notice(message: &str) {
    println!("{} {message}", status::INFO);
}

/// Print a warning
pub fn warning(message: &str) {
    eprintln!("{} {message}", status::WARNING);
}
