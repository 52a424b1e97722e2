//! Dependency collection.
//!
//! Walks the freshly regenerated staging area plus the original source and
//! include locations and sorts every discovered path into one of three lists.
//! Lists keep discovery order and are never deduplicated: the same file may
//! show up twice if it is both staged and listed in a manifest.

mod classify;

pub use classify::{classify, AssetClass, ARCHIVE_EXTENSION};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{PathConfig, RunOptions};
use crate::staging::{
    distribution_path, read_manifest, refresh_distribution, top_level_files, PackageResolver,
    StagingError, StagingKind,
};

/// Paths to hand to `spark-submit`, one list per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLists {
    /// `--py-files`
    pub code_files: Vec<String>,
    /// `--files`
    pub file_assets: Vec<String>,
    /// `--archives`
    pub archive_assets: Vec<String>,
}

impl DependencyLists {
    fn push_asset(&mut self, class: AssetClass, entry: String) {
        match class {
            AssetClass::ArchiveAsset => self.archive_assets.push(entry),
            AssetClass::FileAsset => self.file_assets.push(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code_files.is_empty() && self.file_assets.is_empty() && self.archive_assets.is_empty()
    }
}

/// Regenerate the staging area, then collect every dependency.
///
/// Collection never runs against stale staging data.
pub fn collect(
    paths: &PathConfig,
    options: &RunOptions,
    resolver: &dyn PackageResolver,
) -> Result<DependencyLists, StagingError> {
    refresh_distribution(paths, resolver)?;

    info!("Gathering requirements...");
    let mut deps = DependencyLists {
        code_files: collect_code(paths)?,
        ..Default::default()
    };
    collect_assets(paths, options, &mut deps)?;

    info!(
        code = deps.code_files.len(),
        files = deps.file_assets.len(),
        archives = deps.archive_assets.len(),
        "Dependencies collected"
    );
    Ok(deps)
}

/// Libraries, then source code, then include code, then the include code manifest.
fn collect_code(paths: &PathConfig) -> Result<Vec<String>, StagingError> {
    let mut code = Vec::new();

    if !paths.libraries_dir.is_empty() {
        code.extend(render(top_level_files(Path::new(&paths.libraries_dir))?));
    }

    for (dir, kind) in [
        (&paths.source_code_dir, StagingKind::Source),
        (&paths.include_code_dir, StagingKind::Code),
    ] {
        if is_existing_dir(dir) {
            code.extend(render(top_level_files(Path::new(dir))?));
            code.extend(staged_files(paths, dir, kind)?);
        }
    }

    code.extend(read_manifest(&paths.include_code_file, "Include Code File")?);
    Ok(code)
}

/// Staged archives are routed wholesale; loose entries from the assets
/// directory and the assets manifest are routed one by one.
fn collect_assets(
    paths: &PathConfig,
    options: &RunOptions,
    deps: &mut DependencyLists,
) -> Result<(), StagingError> {
    let archive_channel = options.use_archive_channel;
    let mut loose = Vec::new();

    if is_existing_dir(&paths.include_assets_dir) {
        for entry in staged_files(paths, &paths.include_assets_dir, StagingKind::Assets)? {
            deps.push_asset(classify(&entry, archive_channel, true), entry);
        }
        loose.extend(render(top_level_files(Path::new(&paths.include_assets_dir))?));
    }

    loose.extend(read_manifest(&paths.include_assets_file, "Include Assets File")?);

    for entry in loose {
        deps.push_asset(classify(&entry, archive_channel, false), entry);
    }
    Ok(())
}

fn staged_files(
    paths: &PathConfig,
    original_dir: &str,
    kind: StagingKind,
) -> Result<Vec<String>, StagingError> {
    if paths.distribution_dir.is_empty() {
        return Ok(Vec::new());
    }
    let staging = distribution_path(&paths.distribution_dir, original_dir, kind);
    Ok(render(top_level_files(&staging)?).collect())
}

fn is_existing_dir(dir: &str) -> bool {
    !dir.is_empty() && Path::new(dir).is_dir()
}

fn render(paths: Vec<PathBuf>) -> impl Iterator<Item = String> {
    paths.into_iter().map(path_string)
}

/// Non-UTF-8 paths are passed on lossily, with a warning.
fn path_string(path: PathBuf) -> String {
    match path.into_os_string().into_string() {
        Ok(path) => path,
        Err(raw) => {
            let lossy = raw.to_string_lossy().into_owned();
            warn!("Path '{lossy}' is not valid UTF-8; spark-submit will receive it as shown.");
            lossy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
        (result, logs)
    }

    #[test]
    fn utf8_paths_render_silently() {
        let (rendered, logs) = with_captured_logs(|| {
            render(vec![PathBuf::from("libs/a.whl"), PathBuf::from("src/m.py")]).collect::<Vec<_>>()
        });
        assert_eq!(rendered, vec!["libs/a.whl", "src/m.py"]);
        assert!(logs.is_empty(), "unexpected logs: {logs}");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_rendered_lossily_with_warning() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = PathBuf::from(OsStr::from_bytes(b"assets/caf\xe9.txt"));
        let (rendered, logs) = with_captured_logs(|| path_string(raw));

        assert_eq!(rendered, "assets/caf\u{FFFD}.txt");
        assert_eq!(logs.matches("WARN").count(), 1);
        assert!(logs.contains("not valid UTF-8"));
    }
}
