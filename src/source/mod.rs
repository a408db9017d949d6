// src/source/mod.rs

//! Line sources feeding a stream's channel.
//!
//! - [`reader`] reads newline-delimited text from any async reader; in
//!   production that is standard input.
//! - [`tail`] follows a file by polling for appended bytes.
//! - [`ticker`] provides the poll clock used by [`tail`], injectable so
//!   tests can drive it by hand.
//!
//! Every source runs as its own task and closes its [`Publisher`] when it
//! ends, whether by exhaustion or a terminal error.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use crate::channel::Publisher;

pub mod reader;
pub mod tail;
pub mod ticker;

pub use reader::ReaderSource;
pub use tail::TailSource;
pub use ticker::{IntervalTicker, Ticker};

/// Default interval between polls of a followed file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Where a stream's lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Stdin,
    File(PathBuf),
}

impl SourceKind {
    /// An empty path means standard input.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str().is_empty() {
            SourceKind::Stdin
        } else {
            SourceKind::File(path)
        }
    }

    /// Build the production source for this kind.
    pub fn into_source(self, poll_interval: Duration) -> Box<dyn LineSource> {
        match self {
            SourceKind::Stdin => Box::new(ReaderSource::stdin()),
            SourceKind::File(path) => {
                Box::new(TailSource::new(path, IntervalTicker::new(poll_interval)))
            }
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Stdin => f.write_str("stdin"),
            SourceKind::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A producer of lines for one stream.
///
/// `run` consumes the source: sources are not restartable.
pub trait LineSource: Send + 'static {
    fn run(self: Box<Self>, publisher: Publisher) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

/// Strip a trailing `\n` or `\r\n`.
pub(crate) fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
    }
    if line.ends_with('\r') {
        line.pop();
    }
    line
}
