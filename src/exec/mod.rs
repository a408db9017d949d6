// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait and the concrete
//!   `ProcessRunner` used in production, which tests can replace with a
//!   fake implementation.
//! - [`dispatch`] turns a matched line into an argument list and hands it to
//!   the runner.

pub mod backend;
pub mod dispatch;

pub use backend::{CommandOutput, CommandRunner, ProcessRunner};
pub use dispatch::{Dispatcher, Invocation};
