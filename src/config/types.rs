use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Section holding the eight staging and include locations.
pub const PATHS_SECTION: &str = "PATHS";
/// Section holding behavior switches.
pub const OPTIONS_SECTION: &str = "OPTIONS";
/// Section holding the log verbosity.
pub const LOGGING_SECTION: &str = "LOGGING";

/// Required keys of the `[PATHS]` section, in reporting order.
pub const PATH_KEYS: &[&str] = &[
    "libraries_dir",
    "distribution_dir",
    "source_code_dir",
    "requirements_file",
    "include_code_dir",
    "include_code_file",
    "include_assets_dir",
    "include_assets_file",
];

/// Required keys of the `[OPTIONS]` section.
pub const OPTION_KEYS: &[&str] = &["use_archive_channel"];

/// Required keys of the `[LOGGING]` section.
pub const LOGGING_KEYS: &[&str] = &["level"];

/// Root settings container, one per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "PATHS")]
    pub paths: PathConfig,
    #[serde(rename = "OPTIONS")]
    pub options: RunOptions,
    #[serde(rename = "LOGGING")]
    pub logging: LoggingConfig,
}

/// Filesystem locations used by the staging and collection steps.
///
/// An empty string means the location is intentionally unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Where `pip wheel` drops downloaded packages.
    pub libraries_dir: String,
    /// Root of the regenerated staging area.
    pub distribution_dir: String,
    /// Project source tree; subdirectories are zipped, top-level files are shipped as-is.
    pub source_code_dir: String,
    /// `pip` requirements file.
    pub requirements_file: String,
    /// Extra code tree handled like `source_code_dir`.
    pub include_code_dir: String,
    /// Manifest with one extra code path per line.
    pub include_code_file: String,
    /// Asset tree; subdirectories are zipped, top-level files are shipped as-is.
    pub include_assets_dir: String,
    /// Manifest with one extra asset path per line.
    pub include_assets_file: String,
}

/// Behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Ship zipped assets through `--archives` instead of `--files`.
    pub use_archive_channel: bool,
}

/// Log verbosity on the classic numeric severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: i64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: 20 }
    }
}

impl LoggingConfig {
    /// Map the numeric level onto a tracing filter.
    ///
    /// 10 is debug, 20 info, 30 warning, 40 and above error. Anything below
    /// 10 enables trace output.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level {
            i64::MIN..=9 => LevelFilter::TRACE,
            10..=19 => LevelFilter::DEBUG,
            20..=29 => LevelFilter::INFO,
            30..=39 => LevelFilter::WARN,
            _ => LevelFilter::ERROR,
        }
    }
}
