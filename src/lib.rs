// src/lib.rs

pub mod channel;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod shutdown;
pub mod source;
pub mod stream;

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{
    ConfigFile, InputMode, RawStreamConfig, load_and_validate, validate_stream,
};
use crate::engine::{RunSummary, Runtime};
use crate::errors::StreammonError;
use crate::exec::{Dispatcher, ProcessRunner};
use crate::source::DEFAULT_POLL_INTERVAL;
use crate::stream::Stream;

/// Options shared by every stream in a run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Log each command invocation and its output at `info`.
    pub debug: bool,
    /// How often followed files are polled for new lines.
    pub poll_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            debug: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (flags or config file)
/// - stream construction (patterns and field tokens checked up front)
/// - the process runner and dispatcher
/// - the runtime, stopped by Ctrl-C or when every stream is exhausted
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;
    let options = run_options(&args, &cfg);

    let streams = build_streams(&cfg, options.poll_interval)?;

    if args.dry_run {
        print_dry_run(&streams, &options);
        return Ok(());
    }

    let dispatcher = Dispatcher::new(ProcessRunner::new(), options.debug);
    let runtime = Runtime::new(streams, dispatcher);

    let summary = runtime.run_until(ctrl_c()).await?;
    log_summary(&summary);
    Ok(())
}

/// One-line message printed by `main` for a failed run.
///
/// Errors that stopped startup before anything was watched are labelled as
/// configuration errors.
pub fn error_message(err: &anyhow::Error) -> String {
    let is_config = err
        .downcast_ref::<StreammonError>()
        .is_some_and(StreammonError::is_config_error);

    if is_config {
        format!("streammon config error: {err}")
    } else {
        format!("streammon error: {err}")
    }
}

/// Build the validated configuration from a config file or from flags.
///
/// When `--config` is given all other stream flags are ignored.
pub fn resolve_config(args: &CliArgs) -> crate::errors::Result<ConfigFile> {
    if let Some(path) = args.config.as_deref().filter(|p| !p.is_empty()) {
        debug!(config = %path, "loading streams from config file");
        return load_and_validate(Path::new(path));
    }

    let raw = RawStreamConfig {
        name: None,
        filepath: args.file.clone(),
        delimiter: args.delimiter.clone(),
        regexp: args.regexp.clone(),
        command: args.command.clone(),
        args: args.args.clone(),
    };
    let mode = InputMode::CommandLine {
        stdin_piped: !std::io::stdin().is_terminal(),
    };

    Ok(ConfigFile {
        debug: false,
        poll_interval: None,
        streams: vec![validate_stream(&raw, mode)?],
    })
}

/// Merge flag-level options with those from the config file.
pub fn run_options(args: &CliArgs, cfg: &ConfigFile) -> RunOptions {
    let poll_interval = args
        .poll_interval
        .map(Duration::from_millis)
        .or(cfg.poll_interval)
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    RunOptions {
        debug: args.log || cfg.debug,
        poll_interval,
    }
}

/// Construct one stream per configured entry, failing on the first error.
pub fn build_streams(
    cfg: &ConfigFile,
    poll_interval: Duration,
) -> crate::errors::Result<Vec<Stream>> {
    cfg.streams
        .iter()
        .map(|s| Stream::from_config(s, poll_interval))
        .collect()
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

fn log_summary(summary: &RunSummary) {
    for report in &summary.streams {
        info!(
            stream = %report.name,
            lines = report.lines,
            matched = report.matched,
            failed = report.failed,
            "stream summary"
        );
    }
}

fn print_dry_run(streams: &[Stream], options: &RunOptions) {
    println!("streammon dry-run:");
    println!("  poll_interval: {:?}", options.poll_interval);
    println!("  debug: {}", options.debug);
    println!();
    println!("Streams ({}):", streams.len());

    for stream in streams {
        println!("  - {}", stream.name());
        println!("      source: {}", stream.source_kind());
        println!("      regexp: {}", stream.pattern().as_str());
        println!("      delimiter: {:?}", stream.delimiter());
        println!("      command: {}", stream.command());
        let args: Vec<&str> = stream.arg_templates().iter().map(|t| t.raw()).collect();
        if !args.is_empty() {
            println!("      args: {:?}", args);
        }
        if !stream.field_indices().is_empty() {
            println!("      fields: {:?}", stream.field_indices());
        }
    }

    debug!("dry-run complete (nothing watched)");
}
