//! Build definition discovery
//!
//! Finds `Dockerfile.<arch>` files at the top of a project directory.

use std::path::Path;

use walkdir::WalkDir;

use crate::config::defaults::DEFINITION_PREFIX;
use crate::error::DiscoveryError;

/// List build definition file names in `root`, sorted by name
///
/// Only regular files (or links to them) whose name starts with
/// `Dockerfile.` are collected; everything else is ignored, including
/// unreadable entries and dangling links under other names. Names are
/// returned relative to `root`, which is the build context.
pub fn discover(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut definitions = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if !is_definition_path(e.path()) => {
                tracing::debug!("Skipping unreadable entry: {e}");
                continue;
            }
            Err(e) => {
                return Err(DiscoveryError::Walk {
                    path: root.to_path_buf(),
                    error: e.to_string(),
                })
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!("Skipping non-UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if name.starts_with(DEFINITION_PREFIX) {
            tracing::debug!("Found definition {name}");
            definitions.push(name.to_string());
        }
    }

    Ok(definitions)
}

/// Whether a failed entry would have been a definition
///
/// Errors without a path concern the walk itself and always count.
fn is_definition_path(path: Option<&Path>) -> bool {
    path.map_or(true, |path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(DEFINITION_PREFIX))
    })
}
