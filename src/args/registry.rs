//! Flag registry: the spark-submit flags that carry dependency lists.

/// Dependency channel a flag feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Python code: wheels, zipped packages, modules.
    Code,
    /// Plain files copied into each executor's working directory.
    Files,
    /// Archives unpacked into each executor's working directory.
    Archives,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Long form (e.g., "--py-files").
    pub long: &'static str,
    /// Channel whose collected paths are merged into this flag's value.
    pub channel: Channel,
    /// Human-readable description.
    pub description: &'static str,
}

/// Executable that receives the composed argument vector.
pub const SUBMIT_PROGRAM: &str = "spark-submit";

/// Build the flag registry, in final left-to-right order.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        FlagDef {
            long: "--py-files",
            channel: Channel::Code,
            description: "Comma-separated .zip, .egg or .py files for the PYTHONPATH",
        },
        FlagDef {
            long: "--files",
            channel: Channel::Files,
            description: "Comma-separated files placed in each executor's working directory",
        },
        FlagDef {
            long: "--archives",
            channel: Channel::Archives,
            description: "Comma-separated archives extracted into each executor's working directory",
        },
    ]
}

/// Help section listing the flags whose values get merged with collected paths.
pub fn merged_flags_help() -> String {
    let lines: Vec<String> = flag_registry()
        .iter()
        .map(|def| format!("  {:<12} {}", def.long, def.description))
        .collect();
    format!("Merged spark-submit flags:\n{}", lines.join("\n"))
}

impl FlagDef {
    /// Check if this definition matches the given argument string.
    ///
    /// Returns `None` when it doesn't match, `Some(None)` for the bare flag
    /// (value in the next token) and `Some(Some(value))` for `--flag=value`.
    pub fn matches<'a>(&self, arg: &'a str) -> Option<Option<&'a str>> {
        if arg == self.long {
            return Some(None);
        }
        arg.strip_prefix(self.long)
            .and_then(|rest| rest.strip_prefix('='))
            .map(Some)
    }
}
