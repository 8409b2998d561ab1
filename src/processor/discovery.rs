//! File discovery for pipeline inputs
//!
//! Finds the zip archives the extract stage reads and the processed tables
//! the aggregate stage reads. Results are sorted by path so repeated runs
//! see inputs in the same order.

use crate::error::{CtdError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Check the input root exists and is a readable directory
fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(CtdError::InputNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(CtdError::fatal_configuration(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    std::fs::read_dir(root).map_err(|e| {
        CtdError::fatal_configuration(format!("cannot read {}: {}", root.display(), e))
    })?;
    Ok(())
}

/// Check if a path carries the given extension, ignoring ASCII case
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}

/// Discover every archive under `root`, recursively
///
/// An unreadable root or a root without archives is a fatal configuration
/// error.
pub fn discover_archives(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    check_root(root)?;
    debug!("Searching for .{} archives in: {}", extension, root.display());

    let mut archives = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            CtdError::fatal_configuration(format!("cannot walk {}: {}", root.display(), e))
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            archives.push(entry.into_path());
        }
    }
    archives.sort();

    if archives.is_empty() {
        return Err(CtdError::fatal_configuration(format!(
            "no .{} archives found in {}",
            extension,
            root.display()
        )));
    }

    debug!("Found {} archives", archives.len());
    Ok(archives)
}

/// Discover the processed tables the aggregate stage reads
///
/// Only the root's direct children matching `*.<extension>` are taken.
pub fn discover_tables(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    check_root(root)?;

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        extension.trim_start_matches('.')
    );
    let entries = glob::glob(&pattern).map_err(|e| {
        CtdError::fatal_configuration(format!("invalid table pattern {}: {}", pattern, e))
    })?;

    let mut tables: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    tables.sort();

    if tables.is_empty() {
        return Err(CtdError::fatal_configuration(format!(
            "no .{} tables found in {}",
            extension,
            root.display()
        )));
    }

    debug!("Found {} tables in {}", tables.len(), root.display());
    Ok(tables)
}
