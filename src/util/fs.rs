//! Filesystem utilities.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::BuildError;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), BuildError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| BuildError::io(path, e))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| BuildError::io(path, e))?;
    }
    Ok(())
}

/// Ensure the parent directory of a file exists.
pub fn ensure_parent_dir(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Read a file to string.
pub fn read_to_string(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::io(path, e))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<(), BuildError> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(|e| BuildError::io(path, e))
}

/// Modification time of a file, or `None` if it cannot be read.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Rebuild a relative path from its normal components, dropping `.` segments.
///
/// Keeps relative paths comparable regardless of how they were spelled
/// in configuration (`./src/main.c` vs `src/main.c`).
pub fn normalize_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Case-insensitive comparison of two relative paths.
pub fn paths_eq_ignore_case(a: &Path, b: &Path) -> bool {
    let a = normalize_relative(a);
    let b = normalize_relative(b);
    let mut ai = a.components();
    let mut bi = b.components();
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                let x = x.as_os_str().to_string_lossy().to_lowercase();
                let y = y.as_os_str().to_string_lossy().to_lowercase();
                if x != y {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Whether `path` has one of `extensions` (compared case-insensitively,
/// extensions given with or without a leading dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Recursively collect files under `dir` whose extension matches, returned
/// relative to `base` in file-name order.
///
/// A missing directory yields an empty list.
pub fn collect_files(base: &Path, dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), extensions))
        .map(|entry| relative_path(base, entry.path()))
        .collect()
}
