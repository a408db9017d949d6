// src/stream/mod.rs

//! A watched source plus its match / substitute / dispatch behaviour.
//!
//! A [`Stream`] is built once from a validated [`StreamConfig`]. Its pattern,
//! delimiter, command and argument templates never change afterwards; only
//! its [`LineChannel`] moves from open to closed.
//!
//! The line source is started lazily, on the first [`Stream::attach`].

pub mod fields;
pub mod pattern;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::channel::{LineChannel, Subscriber};
use crate::config::StreamConfig;
use crate::errors::Result;
use crate::shutdown::ShutdownCoordinator;
use crate::source::{LineSource, SourceKind};

pub use fields::{
    FieldTemplate, TOKEN_CLOSE, TOKEN_OPEN, parse_field_indices, parse_templates, split_fields,
    substitute,
};
pub use pattern::{MATCH_ALL, compile_pattern};

pub struct Stream {
    name: String,
    pattern: Regex,
    source_kind: SourceKind,
    delimiter: String,
    command: String,
    arg_templates: Vec<FieldTemplate>,
    field_indices: BTreeSet<usize>,
    lines: LineChannel,
    source: Mutex<Option<Box<dyn LineSource>>>,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("source", &self.source_kind)
            .field("delimiter", &self.delimiter)
            .field("command", &self.command)
            .field("args", &self.arg_templates)
            .field("fields", &self.field_indices)
            .field("lines", &self.lines)
            .finish()
    }
}

impl Stream {
    /// Build a stream reading from the source named in `config`.
    pub fn from_config(config: &StreamConfig, poll_interval: Duration) -> Result<Self> {
        let source = config.source.clone().into_source(poll_interval);
        Self::new(config, source)
    }

    /// Build a stream fed by an explicit line source.
    ///
    /// Fails on an invalid pattern or field token; nothing is started.
    pub fn new(config: &StreamConfig, source: Box<dyn LineSource>) -> Result<Self> {
        let pattern = compile_pattern(&config.regexp)?;
        let arg_templates = parse_templates(config.args.iter().cloned())?;
        let field_indices = fields::collect_indices(&arg_templates);

        debug!(
            stream = %config.name,
            pattern = %config.regexp,
            ?field_indices,
            "stream constructed"
        );

        Ok(Self {
            name: config.name.clone(),
            pattern,
            source_kind: config.source.clone(),
            delimiter: config.delimiter.clone(),
            command: config.command.clone(),
            arg_templates,
            field_indices,
            lines: LineChannel::new(),
            source: Mutex::new(Some(source)),
        })
    }

    /// Attach a new subscriber, starting the line source on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn attach(&self, coordinator: &ShutdownCoordinator) -> Subscriber {
        let subscriber = self.lines.subscribe(coordinator);

        let source = self
            .source
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(source) = source {
            debug!(stream = %self.name, source = %self.source_kind, "starting line source");
            tokio::spawn(source.run(self.lines.publisher()));
        }

        subscriber
    }

    /// Close the line channel; every subscriber sees end-of-sequence.
    pub fn close(&self) {
        self.lines.close();
    }

    pub fn is_closed(&self) -> bool {
        self.lines.is_closed()
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Substitute the fields of `line` into every argument template.
    pub fn prepare_args(&self, line: &str) -> Vec<String> {
        substitute(&self.arg_templates, line, &self.delimiter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn source_kind(&self) -> &SourceKind {
        &self.source_kind
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn arg_templates(&self) -> &[FieldTemplate] {
        &self.arg_templates
    }

    pub fn field_indices(&self) -> &BTreeSet<usize> {
        &self.field_indices
    }

    pub fn lines(&self) -> &LineChannel {
        &self.lines
    }
}
