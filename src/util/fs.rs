//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

/// Directory names used by version-control systems. Subtrees below them are
/// never scanned.
pub const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Read a file to string, replacing invalid UTF-8 sequences.
///
/// Source files are occasionally latin-1 encoded; those are still scanned.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Check whether any component of `path` is a version-control directory.
pub fn is_vcs_path(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_str().is_some_and(|n| VCS_DIRS.contains(&n)),
        _ => false,
    })
}

/// Walk `root` in file-name order, pruning version-control subtrees.
///
/// Directory symlinks are not followed. Entries that cannot be read are
/// skipped with a warning.
pub fn walk(root: &Path) -> impl Iterator<Item = DirEntry> + '_ {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| !is_vcs_path(e.path().strip_prefix(root).unwrap_or(e.path())))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
}

/// Compare two paths by filesystem identity rather than by spelling.
///
/// Symlinks are resolved and hard links compare equal. A path that cannot be
/// inspected (missing, permission denied) never matches.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match ::same_file::is_same_file(a, b) {
        Ok(same) => same,
        Err(e) => {
            tracing::debug!(
                "cannot compare {} with {}: {}",
                a.display(),
                b.display(),
                e
            );
            false
        }
    }
}
