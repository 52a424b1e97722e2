//! Staging layout and clean-slate regeneration.

use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::{info, warn};

use super::archive::archive_top_level_dirs;
use super::resolver::PackageResolver;
use super::StagingError;
use crate::config::PathConfig;

/// Which original directory a staging subdirectory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingKind {
    /// `source_code_dir`.
    Source,
    /// `include_code_dir`.
    Code,
    /// `include_assets_dir`.
    Assets,
}

impl StagingKind {
    /// Suffix appended to the original directory's name.
    pub fn suffix(self) -> &'static str {
        match self {
            StagingKind::Source => "_src",
            StagingKind::Code => "_code",
            StagingKind::Assets => "_assets",
        }
    }
}

/// Staging directory for `original_dir`: `distribution_dir/<basename><suffix>`.
///
/// Two originals sharing a basename and kind map to the same path.
pub fn distribution_path(distribution_dir: &str, original_dir: &str, kind: StagingKind) -> PathBuf {
    let name = format!("{}{}", basename(original_dir), kind.suffix());
    Path::new(distribution_dir).join(name)
}

fn basename(dir: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == MAIN_SEPARATOR;
    dir.trim_end_matches(is_sep).rsplit(is_sep).next().unwrap_or_default()
}

/// Destructive reset: delete `dir` with everything in it, then recreate it empty.
pub fn reset_dir(dir: &Path) -> Result<(), StagingError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|source| StagingError::Reset {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(dir).map_err(|source| StagingError::Reset {
        path: dir.to_path_buf(),
        source,
    })
}

/// Regenerate the staging area from scratch.
///
/// 1. Reset `distribution_dir` and `libraries_dir`.
/// 2. Download requirements into `libraries_dir` (best effort).
/// 3. Archive the subdirectories of `source_code_dir`, `include_code_dir`
///    and `include_assets_dir` into their staging directories.
///
/// Missing optional locations are logged and skipped.
pub fn refresh_distribution(
    paths: &PathConfig,
    resolver: &dyn PackageResolver,
) -> Result<(), StagingError> {
    info!("Deleting old distribution files...");
    for (label, dir) in [
        ("Distribution Directory", &paths.distribution_dir),
        ("Libraries Directory", &paths.libraries_dir),
    ] {
        if dir.is_empty() {
            warn!("{label} is not configured, nothing to reset.");
            continue;
        }
        reset_dir(Path::new(dir))?;
    }

    load_requirements(paths, resolver);

    if paths.distribution_dir.is_empty() {
        warn!("Distribution Directory is not configured, skipping archives.");
        return Ok(());
    }

    for (label, dir, kind) in [
        ("Source code directory", &paths.source_code_dir, StagingKind::Source),
        ("Include Code Directory", &paths.include_code_dir, StagingKind::Code),
        ("Include Assets Directory", &paths.include_assets_dir, StagingKind::Assets),
    ] {
        stage_directory(&paths.distribution_dir, label, dir, kind)?;
    }

    Ok(())
}

fn load_requirements(paths: &PathConfig, resolver: &dyn PackageResolver) {
    if paths.requirements_file.is_empty() {
        return;
    }
    let requirements = Path::new(&paths.requirements_file);
    if !requirements.is_file() {
        warn!(
            "Requirement file '{}' not found. Not loading any external packages.",
            paths.requirements_file
        );
        return;
    }
    if paths.libraries_dir.is_empty() {
        warn!("Libraries Directory is not configured. Not loading any external packages.");
        return;
    }

    info!("Loading external packages with {}...", resolver.name());
    if let Err(e) = resolver.resolve(requirements, Path::new(&paths.libraries_dir)) {
        warn!("Package resolution did not complete cleanly: {e}");
    }
}

fn stage_directory(
    distribution_dir: &str,
    label: &str,
    dir: &str,
    kind: StagingKind,
) -> Result<(), StagingError> {
    if dir.is_empty() {
        return Ok(());
    }
    let original = Path::new(dir);
    if !original.is_dir() {
        warn!("{label} '{dir}' does not exist.");
        return Ok(());
    }

    info!("Processing {label}...");
    let staging = distribution_path(distribution_dir, dir, kind);
    if !staging.is_dir() {
        fs::create_dir_all(&staging).map_err(|source| StagingError::CreateDir {
            path: staging.clone(),
            source,
        })?;
    }
    archive_top_level_dirs(original, &staging)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn distribution_path_appends_suffix_to_basename() {
        let path = distribution_path("dist", "project/include/code", StagingKind::Code);
        assert_eq!(path, Path::new("dist").join("code_code"));
    }

    #[test]
    fn distribution_path_is_pure() {
        let a = distribution_path("dist", "src", StagingKind::Source);
        let b = distribution_path("dist", "src", StagingKind::Source);
        assert_eq!(a, b);
    }

    #[test]
    fn suffix_only_changes_the_tail() {
        for kind in [StagingKind::Source, StagingKind::Code, StagingKind::Assets] {
            let path = distribution_path("dist", "a/assets", kind);
            let name = path.file_name().unwrap().to_str().unwrap();
            assert_eq!(name.strip_suffix(kind.suffix()), Some("assets"));
        }
    }

    #[test]
    fn trailing_separator_is_ignored() {
        assert_eq!(
            distribution_path("dist", "include/assets/", StagingKind::Assets),
            Path::new("dist").join("assets_assets")
        );
    }

    #[test]
    fn reset_dir_empties_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dist");
        fs::create_dir_all(dir.join("old_src")).unwrap();
        fs::write(dir.join("stale.zip"), "stale").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("libs/nested");

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }
}
