// src/config/validate.rs

use std::time::Duration;

use crate::config::args::split_args;
use crate::config::model::{ConfigFile, RawConfigFile, RawStreamConfig, StreamConfig};
use crate::errors::{Result, StreammonError};
use crate::source::SourceKind;
use crate::stream::compile_pattern;

pub const ERR_FILEPATH: &str = "a file must be provided or piped through stdin";
pub const ERR_REGEXP: &str = "you must provide a valid regular expression";
pub const ERR_COMMAND: &str = "you must provide a command to run";
pub const ERR_NO_STREAMS: &str = "the config file must contain at least one stream";

/// Where a stream definition came from; decides whether stdin is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Streams listed in a config file must name a file.
    ConfigFile,
    /// A single stream from flags; stdin is allowed when it is piped.
    CommandLine { stdin_piped: bool },
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StreammonError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        if raw.stream.is_empty() {
            return Err(StreammonError::ConfigError(ERR_NO_STREAMS.to_string()));
        }

        let streams = raw
            .stream
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                validate_stream(entry, InputMode::ConfigFile).map_err(|err| match err {
                    StreammonError::ConfigError(msg) => {
                        StreammonError::ConfigError(format!("stream #{}: {msg}", idx + 1))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile {
            debug: raw.debug,
            poll_interval: raw.poll_interval_ms.map(Duration::from_millis),
            streams,
        })
    }
}

/// Validate one raw stream entry and split its argument string.
pub fn validate_stream(raw: &RawStreamConfig, mode: InputMode) -> Result<StreamConfig> {
    let source = SourceKind::from_path(raw.filepath.trim());

    match (mode, &source) {
        (InputMode::ConfigFile, SourceKind::Stdin) => {
            return Err(StreammonError::ConfigError(ERR_FILEPATH.to_string()));
        }
        (InputMode::CommandLine { stdin_piped: false }, SourceKind::Stdin) => {
            return Err(StreammonError::ConfigError(ERR_FILEPATH.to_string()));
        }
        _ => {}
    }

    if raw.regexp.is_empty() {
        return Err(StreammonError::ConfigError(ERR_REGEXP.to_string()));
    }
    compile_pattern(&raw.regexp)?;

    if raw.command.trim().is_empty() {
        return Err(StreammonError::ConfigError(ERR_COMMAND.to_string()));
    }

    let name = raw
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| source.to_string());

    Ok(StreamConfig {
        name,
        source,
        delimiter: raw.delimiter.clone(),
        regexp: raw.regexp.clone(),
        command: raw.command.trim().to_string(),
        args: split_args(&raw.args),
    })
}
