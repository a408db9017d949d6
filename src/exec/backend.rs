// src/exec/backend.rs

//! Pluggable command execution backend.
//!
//! The dispatcher talks to a `CommandRunner` instead of spawning processes
//! directly. This makes it easy to swap in a fake runner in tests while
//! keeping the production implementation here.
//!
//! - `ProcessRunner` is the default implementation used by `streammon`. It
//!   runs the command with `tokio::process::Command` and waits for it.
//! - Tests can provide their own `CommandRunner` that, for example, records
//!   which argument lists were dispatched.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, StreammonError};

/// Captured result of a successful command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait abstracting how a dispatched command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `args` to completion.
    ///
    /// A launch failure or non-zero exit is returned as an error.
    fn run<'a>(
        &'a self,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>>;
}

/// Real runner used in production: spawns an OS process per invocation.
///
/// The command is executed directly, not through a shell, so field values
/// are passed through as single arguments. Dropping the returned future
/// kills the child.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            let output = Command::new(command)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| StreammonError::CommandLaunch {
                    command: command.to_string(),
                    source,
                })?;

            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if !stderr.is_empty() {
                debug!(command, "stderr: {}", stderr.trim_end());
            }

            if !output.status.success() {
                return Err(StreammonError::CommandFailed {
                    command: command.to_string(),
                    code: output.status.code().unwrap_or(-1),
                    stderr,
                });
            }

            Ok(CommandOutput { stdout, stderr })
        })
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run<'a>(
        &'a self,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        (**self).run(command, args)
    }
}
