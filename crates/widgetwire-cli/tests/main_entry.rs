//! Integration tests for the `widgetwire` binary entry point.
//!
//! Covers reading messages from files and standard input, exit statuses,
//! and diagnostics written to stderr.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const MESSAGE: &str = r#"org.eclipse.rwt.protocol.Processor.processMessage( {"head": {"requestCounter": 9}, "operations": [{"action": "create", "target": "w2", "type": "Label", "properties": {"text": "hi"}}, {"action": "destroy", "target": "w1"}]} );"#;

#[test]
fn inspects_message_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("message.js");
    fs::write(&path, MESSAGE).expect("write message");

    let mut command = cargo_bin_cmd!("widgetwire");
    command.args(["inspect", "--output", "human"]).arg(&path);
    command
        .assert()
        .success()
        .stdout(contains("request counter: 9"))
        .stdout(contains(r#"create w2 Label text="hi""#))
        .stdout(contains("destroy w1"));
}

#[test]
fn reads_standard_input_as_json_lines() {
    let mut command = cargo_bin_cmd!("widgetwire");
    command.args(["inspect", "--output", "json", "-"]).write_stdin(MESSAGE);
    command
        .assert()
        .success()
        .stdout(contains(r#"{"action":"destroy","target":"w1"}"#))
        .stdout(contains("request counter").not());
}

#[test]
fn missing_operations_exits_with_rejection() {
    let mut command = cargo_bin_cmd!("widgetwire");
    command.arg("inspect").write_stdin(r#"{"foo": 23}"#);
    command
        .assert()
        .code(1)
        .stderr(contains("Missing operations array"));
}

#[test]
fn missing_file_exits_with_io_status() {
    let dir = TempDir::new().expect("temp dir");
    let mut command = cargo_bin_cmd!("widgetwire");
    command.arg("inspect").arg(dir.path().join("absent.json"));
    command.assert().code(2).stderr(contains("failed to read"));
}

#[test]
fn invalid_log_filter_is_a_usage_error() {
    let mut command = cargo_bin_cmd!("widgetwire");
    command
        .args(["--log-filter", "widgetwire=loud", "inspect"])
        .write_stdin(MESSAGE);
    command
        .assert()
        .code(1)
        .stderr(contains("invalid log filter"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let mut command = cargo_bin_cmd!("widgetwire");
    command
        .args([
            "--log-filter",
            "debug",
            "--log-format",
            "json",
            "inspect",
            "--output",
            "json",
        ])
        .write_stdin(MESSAGE);
    command
        .assert()
        .success()
        .stderr(contains("parsed incoming message"))
        .stdout(contains("parsed incoming message").not());
}

#[test]
fn missing_subcommand_exits_with_failure() {
    let mut command = cargo_bin_cmd!("widgetwire");
    command.assert().code(1).stderr(contains("Usage"));
}
