// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreammonError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid field token `#{{{token}}}` in argument `{template}`")]
    InvalidFieldToken { template: String, token: String },

    #[error("error reading {source_name}: {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("failed to launch command `{command}`: {source}")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` exited with status {code}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("streamer closed for publishing")]
    ChannelClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StreammonError {
    /// Errors that must abort startup before any stream is watched.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StreammonError::ConfigError(_)
                | StreammonError::InvalidPattern { .. }
                | StreammonError::InvalidFieldToken { .. }
                | StreammonError::JsonError(_)
                | StreammonError::TomlError(_)
        )
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

pub type Result<T> = std::result::Result<T, StreammonError>;
