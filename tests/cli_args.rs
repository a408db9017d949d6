// tests/cli_args.rs

use clap::Parser;
use streammon::cli::{CliArgs, LogLevel};
use streammon::config::ConfigFile;
use streammon::logging::resolve_level;
use streammon::errors::StreammonError;
use streammon::{error_message, resolve_config, run_options};
use std::time::Duration;

#[test]
fn flags_have_documented_defaults() {
    let args = CliArgs::try_parse_from(["streammon", "-c", "touch"]).unwrap();

    assert_eq!(args.file, "");
    assert_eq!(args.delimiter, " ");
    assert_eq!(args.regexp, ".*");
    assert_eq!(args.command, "touch");
    assert_eq!(args.args, "");
    assert!(args.config.is_none());
    assert!(!args.log);
    assert!(!args.dry_run);
}

#[test]
fn short_flags_map_to_stream_fields() {
    let args = CliArgs::try_parse_from([
        "streammon",
        "-f",
        "/var/log/messages",
        "-d",
        ",",
        "-r",
        "DHCPREQUEST",
        "-c",
        "redis-cli",
        "-a",
        "publish leases 'ip:#{3}'",
        "-l",
    ])
    .unwrap();

    assert_eq!(args.file, "/var/log/messages");
    assert_eq!(args.delimiter, ",");
    assert_eq!(args.regexp, "DHCPREQUEST");
    assert!(args.log);

    let cfg = resolve_config(&args).unwrap();
    assert_eq!(cfg.streams.len(), 1);
    assert_eq!(cfg.streams[0].args, vec!["publish", "leases", "'ip:#{3}'"]);
}

#[test]
fn missing_config_file_is_reported() {
    let args = CliArgs::try_parse_from(["streammon", "-k", "/nonexistent/streammon.json"]).unwrap();
    assert!(resolve_config(&args).is_err());
}

#[test]
fn flag_options_override_config_file() {
    let cfg = ConfigFile {
        debug: false,
        poll_interval: Some(Duration::from_millis(500)),
        streams: vec![],
    };

    let args = CliArgs::try_parse_from(["streammon", "-l", "--poll-interval", "10"]).unwrap();
    let options = run_options(&args, &cfg);
    assert!(options.debug);
    assert_eq!(options.poll_interval, Duration::from_millis(10));

    let args = CliArgs::try_parse_from(["streammon"]).unwrap();
    let options = run_options(&args, &cfg);
    assert!(!options.debug);
    assert_eq!(options.poll_interval, Duration::from_millis(500));
}

#[test]
fn log_level_flag_beats_environment() {
    assert_eq!(
        resolve_level(Some(LogLevel::Warn), Some("trace")),
        tracing::Level::WARN
    );
    assert_eq!(resolve_level(None, Some("DEBUG")), tracing::Level::DEBUG);
    assert_eq!(resolve_level(None, Some("loud")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}

#[test]
fn config_errors_get_their_own_label() {
    let args = CliArgs::try_parse_from(["streammon", "-f", "/var/log/x", "-r", "("]).unwrap();
    let err = anyhow::Error::from(resolve_config(&args).unwrap_err());
    assert!(error_message(&err).starts_with("streammon config error: "));

    let err = anyhow::Error::from(StreammonError::CommandFailed {
        command: "false".to_string(),
        code: 1,
        stderr: String::new(),
    });
    assert_eq!(
        error_message(&err),
        "streammon error: command `false` exited with status 1"
    );
}
