//! Project configuration: staging locations, run options and log level.

pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::{
    LoggingConfig, PathConfig, RunOptions, Settings, LOGGING_KEYS, LOGGING_SECTION,
    OPTIONS_SECTION, OPTION_KEYS, PATHS_SECTION, PATH_KEYS,
};
