// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{CommandFactory, Parser, ValueEnum};

/// Command-line arguments for `streammon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "streammon",
    version,
    about = "Watch a file or stdin and run a command for every matching line.",
    long_about = None
)]
pub struct CliArgs {
    /// A full path to a file to monitor. Omit to read piped stdin.
    #[arg(short = 'f', long = "file", value_name = "PATH", default_value = "")]
    pub file: String,

    /// A delimiter to split a matching line.
    #[arg(short = 'd', long, value_name = "DELIM", default_value = " ")]
    pub delimiter: String,

    /// A regular expression to match.
    #[arg(short = 'r', long, value_name = "REGEXP", default_value = ".*")]
    pub regexp: String,

    /// A command to run after a match is found.
    #[arg(short = 'c', long, value_name = "CMD", default_value = "")]
    pub command: String,

    /// A quoted string of arguments to the command; `#{N}` is replaced by
    /// field N of the matched line, `#{0}` by the whole line.
    #[arg(short = 'a', long, value_name = "ARGS", default_value = "")]
    pub args: String,

    /// A configuration file to read from; all other stream flags are ignored.
    #[arg(short = 'k', long, value_name = "PATH")]
    pub config: Option<String>,

    /// Log every command invocation and its output.
    #[arg(short = 'l')]
    pub log: bool,

    /// Poll interval for followed files, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STREAMMON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the streams, but don't watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Full usage text.
pub fn usage() -> String {
    CliArgs::command().render_help().to_string()
}
