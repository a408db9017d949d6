// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::{Builder, NamedTempFile};
use streammon::config::validate::{ERR_COMMAND, ERR_FILEPATH, ERR_NO_STREAMS, ERR_REGEXP};
use streammon::config::{
    ConfigFormat, InputMode, load_and_validate, parse_str, split_args, validate_stream,
};
use streammon::errors::StreammonError;
use streammon::source::SourceKind;
use streammon_test_utils::builders::RawStreamConfigBuilder;

fn expect_config_error(result: Result<impl std::fmt::Debug, StreammonError>, needle: &str) {
    match result {
        Err(StreammonError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should contain {needle:?}")
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(v) => panic!("Expected error, got Ok({v:?})"),
    }
}

#[test]
fn split_args_preserves_single_quoted_groups() {
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("", vec![]),
        ("foo bar baz", vec!["foo", "bar", "baz"]),
        ("foo 'bar baz'", vec!["foo", "'bar baz'"]),
        ("'bar baz' foo", vec!["'bar baz'", "foo"]),
        ("'filename filename2'", vec!["'filename filename2'"]),
        (
            "one with several 'filename filename2'",
            vec!["one", "with", "several", "'filename filename2'"],
        ),
        ("foo 'bar baz' fuzz", vec!["foo", "'bar baz'", "fuzz"]),
        (
            "foo 'bar baz' fuzz 'groups are hard'",
            vec!["foo", "'bar baz'", "fuzz", "'groups are hard'"],
        ),
        ("  spaced   out  ", vec!["spaced", "out"]),
        ("'unterminated group", vec!["'unterminated group'"]),
        ("publish key 'ip:#{3},mac:#{5}'", vec!["publish", "key", "'ip:#{3},mac:#{5}'"]),
    ];

    for (input, expected) in cases {
        assert_eq!(split_args(input), expected, "input: {input:?}");
    }
}

#[test]
fn validate_requires_file_in_config_mode() {
    let raw = RawStreamConfigBuilder::new().command("touch").build();
    expect_config_error(validate_stream(&raw, InputMode::ConfigFile), ERR_FILEPATH);
}

#[test]
fn validate_allows_stdin_only_when_piped() {
    let raw = RawStreamConfigBuilder::new().command("touch").build();

    expect_config_error(
        validate_stream(&raw, InputMode::CommandLine { stdin_piped: false }),
        ERR_FILEPATH,
    );

    let cfg = validate_stream(&raw, InputMode::CommandLine { stdin_piped: true }).unwrap();
    assert_eq!(cfg.source, SourceKind::Stdin);
    assert_eq!(cfg.name, "stdin");
}

#[test]
fn validate_rejects_empty_or_invalid_regexp() {
    let raw = RawStreamConfigBuilder::new()
        .filepath("/home")
        .regexp("")
        .command("touch")
        .build();
    expect_config_error(validate_stream(&raw, InputMode::ConfigFile), ERR_REGEXP);

    let raw = RawStreamConfigBuilder::new()
        .filepath("/home")
        .regexp("(")
        .command("touch")
        .build();
    match validate_stream(&raw, InputMode::ConfigFile) {
        Err(e @ StreammonError::InvalidPattern { .. }) => assert!(e.is_config_error()),
        other => panic!("Expected InvalidPattern, got: {other:?}"),
    }
}

#[test]
fn validate_requires_command() {
    let raw = RawStreamConfigBuilder::new().filepath("/home").build();
    expect_config_error(validate_stream(&raw, InputMode::ConfigFile), ERR_COMMAND);
}

#[test]
fn validate_accepts_complete_entry() {
    let raw = RawStreamConfigBuilder::new()
        .filepath("/home")
        .command("touch")
        .args("foo 'bar baz'")
        .build();
    let cfg = validate_stream(&raw, InputMode::ConfigFile).unwrap();

    assert_eq!(cfg.source, SourceKind::File(PathBuf::from("/home")));
    assert_eq!(cfg.delimiter, " ");
    assert_eq!(cfg.regexp, ".*");
    assert_eq!(cfg.command, "touch");
    assert_eq!(cfg.args, vec!["foo", "'bar baz'"]);
}

#[test]
fn json_config_rejects_empty_and_invalid_input() {
    expect_config_error(parse_str("", ConfigFormat::Json), "empty");

    match parse_str("Invalid JSON", ConfigFormat::Json) {
        Err(e @ StreammonError::JsonError(_)) => assert!(e.is_config_error()),
        other => panic!("Expected JsonError, got: {other:?}"),
    }
}

#[test]
fn json_config_with_incomplete_entry_is_invalid() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[{{}}]").unwrap();

    expect_config_error(load_and_validate(file.path()), ERR_FILEPATH);
}

#[test]
fn json_config_with_no_entries_is_invalid() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[]").unwrap();

    expect_config_error(load_and_validate(file.path()), ERR_NO_STREAMS);
}

#[test]
fn json_config_loads_multiple_streams() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{
                "filepath": "/var/log/messages",
                "delimiter": " ",
                "regexp": "MATCHTHIS.*",
                "command": "redis-cli",
                "args": "publish key 'value'"
            }},
            {{
                "filepath": "/var/log/nginx.log",
                "regexp": "GET.* 200 ",
                "command": "redis-cli",
                "args": "publish key 'other value'"
            }}
        ]"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    assert!(!cfg.debug);
    assert_eq!(cfg.poll_interval, None);
    assert_eq!(cfg.streams.len(), 2);

    let second = &cfg.streams[1];
    assert_eq!(second.name, "/var/log/nginx.log");
    assert_eq!(second.delimiter, " ");
    assert_eq!(second.args, vec!["publish", "key", "'other value'"]);
}

#[test]
fn toml_config_loads_globals_and_streams() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
debug = true
poll_interval_ms = 40

[[stream]]
name = "leases"
filepath = "/var/log/messages"
regexp = "DHCPREQUEST"
command = "notify"
args = "ip:#{{3}} mac:#{{5}}"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    assert!(cfg.debug);
    assert_eq!(cfg.poll_interval, Some(Duration::from_millis(40)));
    assert_eq!(cfg.streams.len(), 1);
    assert_eq!(cfg.streams[0].name, "leases");
    assert_eq!(cfg.streams[0].args, vec!["ip:#{3}", "mac:#{5}"]);
}

#[test]
fn invalid_entry_reports_its_position() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{ "filepath": "/a", "command": "touch" }},
            {{ "filepath": "/b" }}
        ]"#
    )
    .unwrap();

    expect_config_error(load_and_validate(file.path()), "stream #2");
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.json"));
    assert!(matches!(result, Err(StreammonError::IoError(_))));
}
