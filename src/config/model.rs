// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::source::SourceKind;

/// One stream entry as written in a configuration file.
///
/// JSON files are a top-level array of these:
///
/// ```json
/// [
///   {
///     "filepath": "/var/log/messages",
///     "delimiter": " ",
///     "regexp": "DHCPREQUEST.*",
///     "command": "redis-cli",
///     "args": "publish leases 'ip:#{3},mac:#{5}'"
///   }
/// ]
/// ```
///
/// TOML files use `[[stream]]` tables with the same keys.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStreamConfig {
    /// Optional label used in logs; defaults to the source path.
    #[serde(default)]
    pub name: Option<String>,

    /// File to follow. Empty means standard input.
    #[serde(default)]
    pub filepath: String,

    /// Delimiter used to split a matched line into fields.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Regular expression a line must match to trigger the command.
    #[serde(default = "default_regexp")]
    pub regexp: String,

    /// Program to run on a match.
    #[serde(default)]
    pub command: String,

    /// Space separated argument string; single-quoted groups stay together.
    #[serde(default)]
    pub args: String,
}

impl Default for RawStreamConfig {
    fn default() -> Self {
        Self {
            name: None,
            filepath: String::new(),
            delimiter: default_delimiter(),
            regexp: default_regexp(),
            command: String::new(),
            args: String::new(),
        }
    }
}

pub fn default_delimiter() -> String {
    " ".to_string()
}

pub fn default_regexp() -> String {
    crate::stream::MATCH_ALL.to_string()
}

/// Top-level TOML configuration.
///
/// ```toml
/// debug = true
/// poll_interval_ms = 500
///
/// [[stream]]
/// filepath = "/var/log/nginx/access.log"
/// regexp = "^POST.*"
/// command = "notify.sh"
/// args = "'#{0}'"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Log every command invocation and its output.
    #[serde(default)]
    pub debug: bool,

    /// Poll interval for followed files, in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    #[serde(default)]
    pub stream: Vec<RawStreamConfig>,
}

/// A validated stream definition.
///
/// Every field is a plain value; the regexp is known to compile and the
/// command is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub name: String,
    pub source: SourceKind,
    pub delimiter: String,
    pub regexp: String,
    pub command: String,
    pub args: Vec<String>,
}

/// Validated configuration for a whole run.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub debug: bool,
    pub poll_interval: Option<Duration>,
    pub streams: Vec<StreamConfig>,
}
