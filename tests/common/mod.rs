//! Shared test utilities: scratch projects and a recording package resolver.

#![allow(dead_code, unused_imports)]

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use spark_submit_project::config::{PathConfig, RunOptions};
use spark_submit_project::staging::{PackageResolver, ResolveError};
use tempfile::TempDir;

/// Name of the wheel the recording resolver drops into the libraries directory.
pub const FAKE_WHEEL: &str = "emoji-2.10.1-py2.py3-none-any.whl";

/// Stands in for `pip wheel`: records calls and writes one fake wheel.
#[derive(Default)]
pub struct RecordingResolver {
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    pub fail: bool,
}

impl RecordingResolver {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl PackageResolver for RecordingResolver {
    fn name(&self) -> &str {
        "recording"
    }

    fn resolve(&self, requirements_file: &Path, output_dir: &Path) -> Result<(), ResolveError> {
        self.calls
            .borrow_mut()
            .push((requirements_file.to_path_buf(), output_dir.to_path_buf()));
        if self.fail {
            return Err(ResolveError::Failed {
                program: "recording".into(),
                code: Some(1),
            });
        }
        std::fs::write(output_dir.join(FAKE_WHEEL), b"wheel").expect("Failed to write wheel");
        Ok(())
    }
}

/// A throwaway project directory.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Absolute path as a config string.
    pub fn str(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    pub fn mkdir(&self, rel: &str) {
        std::fs::create_dir_all(self.path(rel)).expect("Failed to create dir");
    }

    /// Standard layout. Only the staging roots are guaranteed to be used;
    /// the other locations exist only if a test creates them.
    pub fn paths(&self) -> PathConfig {
        PathConfig {
            libraries_dir: self.str("ssp/libs"),
            distribution_dir: self.str("ssp/dist"),
            source_code_dir: self.str("src"),
            requirements_file: self.str("requirements.txt"),
            include_code_dir: self.str("include/code"),
            include_code_file: self.str("include/include_code.txt"),
            include_assets_dir: self.str("include/assets"),
            include_assets_file: self.str("include/include_assets.txt"),
        }
    }

    /// Layout with every optional location unset.
    pub fn bare_paths(&self) -> PathConfig {
        PathConfig {
            libraries_dir: self.str("ssp/libs"),
            distribution_dir: self.str("ssp/dist"),
            ..Default::default()
        }
    }

    /// Write an `ssp.toml` for `paths` and return its location.
    pub fn write_config(&self, paths: &PathConfig, use_archive_channel: bool) -> PathBuf {
        let content = format!(
            r#"[PATHS]
libraries_dir = '{}'
distribution_dir = '{}'
source_code_dir = '{}'
requirements_file = '{}'
include_code_dir = '{}'
include_code_file = '{}'
include_assets_dir = '{}'
include_assets_file = '{}'

[OPTIONS]
use_archive_channel = {}

[LOGGING]
level = 30
"#,
            paths.libraries_dir,
            paths.distribution_dir,
            paths.source_code_dir,
            paths.requirements_file,
            paths.include_code_dir,
            paths.include_code_file,
            paths.include_assets_dir,
            paths.include_assets_file,
            use_archive_channel,
        );
        self.write(".spark-submit-project/ssp.toml", &content);
        self.path(".spark-submit-project/ssp.toml")
    }
}

pub fn options(use_archive_channel: bool) -> RunOptions {
    RunOptions {
        use_archive_channel,
    }
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// In-memory log sink shared with a test subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with a thread-local subscriber and return its result plus every
/// WARN-or-worse line it logged.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let lines = buffer.contents().lines().map(String::from).collect();
    (result, lines)
}
