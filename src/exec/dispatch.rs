// src/exec/dispatch.rs

//! Match → substitute → execute for a single line.

use tracing::{debug, info};

use crate::errors::Result;
use crate::stream::Stream;

use super::backend::{CommandOutput, CommandRunner};

/// What a dispatched command was called with, and what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub output: CommandOutput,
}

/// Runs a stream's command for every matching line.
#[derive(Debug, Clone)]
pub struct Dispatcher<R> {
    runner: R,
    log_invocations: bool,
}

impl<R: CommandRunner> Dispatcher<R> {
    /// `log_invocations` raises invocation traces from `debug` to `info`.
    pub fn new(runner: R, log_invocations: bool) -> Self {
        Self {
            runner,
            log_invocations,
        }
    }

    /// Handle one candidate line.
    ///
    /// Returns `Ok(None)` when the line does not match the stream's pattern.
    pub async fn dispatch(&self, stream: &Stream, line: &str) -> Result<Option<Invocation>> {
        if !stream.matches(line) {
            return Ok(None);
        }

        let args = stream.prepare_args(line);
        let command = stream.command();

        if self.log_invocations {
            info!(stream = %stream.name(), command, ?args, "calling command");
        } else {
            debug!(stream = %stream.name(), command, ?args, "calling command");
        }

        let output = self.runner.run(command, &args).await?;

        if !output.stdout.is_empty() {
            let stdout = output.stdout.trim_end();
            if self.log_invocations {
                info!(stream = %stream.name(), matched = line, "output: {stdout}");
            } else {
                debug!(stream = %stream.name(), matched = line, "output: {stdout}");
            }
        }

        Ok(Some(Invocation {
            command: command.to_string(),
            args,
            output,
        }))
    }
}
