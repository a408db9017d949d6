#![allow(dead_code)]

use streammon::config::{RawStreamConfig, StreamConfig};
use streammon::source::{LineSource, ReaderSource, SourceKind};
use streammon::stream::Stream;

/// Builder for `StreamConfig` to simplify test setup.
///
/// Defaults: stdin source, space delimiter, match-all pattern, `echo`.
pub struct StreamConfigBuilder {
    config: StreamConfig,
}

impl StreamConfigBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            config: StreamConfig {
                name: "test".to_string(),
                source: SourceKind::Stdin,
                delimiter: " ".to_string(),
                regexp: ".*".to_string(),
                command: command.to_string(),
                args: vec![],
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.source = SourceKind::File(path.into());
        self
    }

    pub fn regexp(mut self, pattern: &str) -> Self {
        self.config.regexp = pattern.to_string();
        self
    }

    pub fn delimiter(mut self, delim: &str) -> Self {
        self.config.delimiter = delim.to_string();
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.config.args.push(arg.to_string());
        self
    }

    pub fn build(self) -> StreamConfig {
        self.config
    }

    /// Build a stream fed by `source`.
    pub fn stream_with(self, source: Box<dyn LineSource>) -> Stream {
        Stream::new(&self.config, source).expect("Failed to build valid stream from builder")
    }

    /// Build a stream that reads the given text as if it were piped stdin.
    pub fn stream_from_text(self, text: &'static str) -> Stream {
        self.stream_with(Box::new(ReaderSource::new("test-input", text.as_bytes())))
    }
}

/// Builder for raw config entries, as read from a config file.
pub struct RawStreamConfigBuilder {
    raw: RawStreamConfig,
}

impl RawStreamConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawStreamConfig::default(),
        }
    }

    pub fn filepath(mut self, path: &str) -> Self {
        self.raw.filepath = path.to_string();
        self
    }

    pub fn regexp(mut self, pattern: &str) -> Self {
        self.raw.regexp = pattern.to_string();
        self
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.raw.command = cmd.to_string();
        self
    }

    pub fn args(mut self, args: &str) -> Self {
        self.raw.args = args.to_string();
        self
    }

    pub fn build(self) -> RawStreamConfig {
        self.raw
    }
}

impl Default for RawStreamConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
