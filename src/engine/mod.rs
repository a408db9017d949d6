// src/engine/mod.rs

//! Top-level driver.
//!
//! [`runtime`] attaches one consumer per stream, waits for all of them and
//! reports what each one saw.

pub mod runtime;

pub use runtime::{DEFAULT_SHUTDOWN_GRACE, Runtime, watch_stream};

/// Per-stream counters collected by a consumer loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub index: usize,
    pub name: String,
    /// Lines received from the channel.
    pub lines: u64,
    /// Lines that matched the pattern (including failed dispatches).
    pub matched: u64,
    /// Dispatches whose command failed to launch or exited non-zero.
    pub failed: u64,
}

impl StreamReport {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub streams: Vec<StreamReport>,
}

impl RunSummary {
    pub fn total_matched(&self) -> u64 {
        self.streams.iter().map(|s| s.matched).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.streams.iter().map(|s| s.failed).sum()
    }
}
