use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};

use crate::config::types::{
    LoggingConfig, PathConfig, RunOptions, Settings, LOGGING_KEYS, LOGGING_SECTION, OPTIONS_SECTION,
    OPTION_KEYS, PATHS_SECTION, PATH_KEYS,
};

/// Errors that can occur when loading configuration.
///
/// Every variant is fatal: there is no partial or default configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Config file '{path}' was not found. Run spark-submit-project from the project \
         directory or point --ssp-config at the configuration file"
    )]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "Section [{section}] is missing from the config file.\n\n  \
         The list of required keys is:\n  [{section}]\n  {}",
        .required.join("\n  ")
    )]
    MissingSection {
        section: &'static str,
        required: &'static [&'static str],
    },

    #[error(
        "Configuration for [{section}] is incomplete, missing: {}.\n\n  \
         The list of required keys is:\n  [{section}]\n  {}",
        .missing.join(", "),
        .required.join("\n  ")
    )]
    MissingKeys {
        section: &'static str,
        missing: Vec<&'static str>,
        required: &'static [&'static str],
    },

    #[error("Unable to read [{section}] key '{key}' as {expected} (found {found})")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl Settings {
    /// Default location of the configuration file, relative to the project directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(".spark-submit-project").join("ssp.toml")
    }

    /// Loads and validates settings from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses settings from TOML text. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let doc: Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            logging: LoggingConfig::from_table(&doc)?,
            paths: PathConfig::from_table(&doc)?,
            options: RunOptions::from_table(&doc)?,
        })
    }

    /// Render the settings back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl PathConfig {
    /// Read the `[PATHS]` section. All eight keys are required.
    pub fn from_table(doc: &Table) -> Result<Self, ConfigError> {
        let section = required_section(doc, PATHS_SECTION, PATH_KEYS)?;
        let get = |key: &'static str| string_value(section, PATHS_SECTION, key);

        Ok(Self {
            libraries_dir: get("libraries_dir")?,
            distribution_dir: get("distribution_dir")?,
            source_code_dir: get("source_code_dir")?,
            requirements_file: get("requirements_file")?,
            include_code_dir: get("include_code_dir")?,
            include_code_file: get("include_code_file")?,
            include_assets_dir: get("include_assets_dir")?,
            include_assets_file: get("include_assets_file")?,
        })
    }
}

impl RunOptions {
    /// Read the `[OPTIONS]` section.
    pub fn from_table(doc: &Table) -> Result<Self, ConfigError> {
        let section = required_section(doc, OPTIONS_SECTION, OPTION_KEYS)?;
        Ok(Self {
            use_archive_channel: bool_value(section, OPTIONS_SECTION, "use_archive_channel")?,
        })
    }
}

impl LoggingConfig {
    /// Read the `[LOGGING]` section.
    pub fn from_table(doc: &Table) -> Result<Self, ConfigError> {
        let section = required_section(doc, LOGGING_SECTION, LOGGING_KEYS)?;
        Ok(Self {
            level: int_value(section, LOGGING_SECTION, "level")?,
        })
    }
}

/// Look up `name` and check that every required key is present.
///
/// Every missing key is reported in one error.
fn required_section<'a>(
    doc: &'a Table,
    name: &'static str,
    required: &'static [&'static str],
) -> Result<&'a Table, ConfigError> {
    let section = match doc.get(name) {
        Some(Value::Table(section)) => section,
        Some(other) => {
            return Err(ConfigError::InvalidValue {
                section: name,
                key: name,
                expected: "a section",
                found: other.type_str().to_string(),
            })
        }
        None => {
            return Err(ConfigError::MissingSection {
                section: name,
                required,
            })
        }
    };

    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|key| !section.contains_key(*key))
        .collect();

    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys {
            section: name,
            missing,
            required,
        });
    }

    Ok(section)
}

fn string_value(
    section: &Table,
    section_name: &'static str,
    key: &'static str,
) -> Result<String, ConfigError> {
    match section.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(invalid(section_name, key, "a string", other)),
    }
}

fn bool_value(
    section: &Table,
    section_name: &'static str,
    key: &'static str,
) -> Result<bool, ConfigError> {
    match section.get(key) {
        Some(Value::Boolean(b)) => Ok(*b),
        Some(Value::String(s)) => parse_bool_literal(s)
            .ok_or_else(|| invalid(section_name, key, "a boolean", section.get(key))),
        other => Err(invalid(section_name, key, "a boolean", other)),
    }
}

fn int_value(
    section: &Table,
    section_name: &'static str,
    key: &'static str,
) -> Result<i64, ConfigError> {
    match section.get(key) {
        Some(Value::Integer(i)) => Ok(*i),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| invalid(section_name, key, "an integer", section.get(key))),
        other => Err(invalid(section_name, key, "an integer", other)),
    }
}

/// Boolean literals accepted in string form, case-insensitive.
fn parse_bool_literal(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(
    section: &'static str,
    key: &'static str,
    expected: &'static str,
    found: Option<&Value>,
) -> ConfigError {
    let found = match found {
        Some(Value::String(s)) => format!("'{s}'"),
        Some(value) => value.type_str().to_string(),
        None => "nothing".to_string(),
    };
    ConfigError::InvalidValue {
        section,
        key,
        expected,
        found,
    }
}
