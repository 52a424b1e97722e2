//! Non-recursive directory listings and manifest reading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::StagingError;

/// Immediate subdirectories of `dir`, sorted by name.
///
/// A missing directory lists as empty.
pub fn top_level_dirs(dir: &Path) -> Result<Vec<PathBuf>, StagingError> {
    list(dir, |path| path.is_dir())
}

/// Immediate files of `dir`, sorted by name.
///
/// A missing directory lists as empty.
pub fn top_level_files(dir: &Path) -> Result<Vec<PathBuf>, StagingError> {
    list(dir, |path| path.is_file())
}

fn list(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, StagingError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let read_err = |source: std::io::Error| StagingError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Trimmed, non-blank lines of an include manifest.
///
/// An empty `path` means the manifest is unset. A configured manifest that
/// does not exist is logged under `label` and contributes nothing.
pub fn read_manifest(path: &str, label: &str) -> Result<Vec<String>, StagingError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }

    let file = Path::new(path);
    if !file.is_file() {
        warn!("{label} '{path}' does not exist.");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(file).map_err(|source| StagingError::ReadManifest {
        path: file.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
