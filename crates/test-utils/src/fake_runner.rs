use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use streammon::errors::{Result, StreammonError};
use streammon::exec::{CommandOutput, CommandRunner};

/// One recorded command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: String,
    pub args: Vec<String>,
}

/// A fake runner that:
/// - records every command it was asked to run
/// - succeeds with empty output, fails with the configured exit code, or
///   never completes
/// - optionally forwards each call over a channel so tests can await it.
#[derive(Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_with: Option<i32>,
    hang: bool,
    notify: Option<mpsc::UnboundedSender<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation exits with `code`.
    pub fn failing(code: i32) -> Self {
        Self {
            fail_with: Some(code),
            ..Self::default()
        }
    }

    /// Every invocation is recorded and then never finishes, like a
    /// command that hangs.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Also send each call to the returned receiver.
    pub fn with_notifications(mut self) -> (Self, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.notify = Some(tx);
        (self, rx)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a self,
        command: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            let call = Call {
                command: command.to_string(),
                args: args.to_vec(),
            };
            {
                let mut guard = self.calls.lock().unwrap();
                guard.push(call.clone());
            }
            if let Some(tx) = &self.notify {
                let _ = tx.send(call);
            }

            if self.hang {
                std::future::pending::<()>().await;
            }

            match self.fail_with {
                Some(code) => Err(StreammonError::CommandFailed {
                    command: command.to_string(),
                    code,
                    stderr: String::new(),
                }),
                None => Ok(CommandOutput::default()),
            }
        })
    }
}
