use super::*;

use std::cell::RefCell;
use std::ffi::OsString;

use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, scenario, then, when};
use widgetwire_protocol::{Envelope, MessageWriter, PropertyMap};

use crate::output::describe;

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[rstest]
#[case::auto_terminal(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
#[case::auto_redirected(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
#[case::human(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
#[case::json(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
fn output_format_resolution(
    #[case] format: OutputFormat,
    #[case] stdout_is_terminal: bool,
    #[case] expected: ResolvedOutputFormat,
) {
    assert_eq!(format.resolve(stdout_is_terminal), expected);
}

#[test]
fn describes_each_operation_kind() {
    let mut writer = MessageWriter::new();
    writer.append_create("w2", "Button");
    writer.append_set("w2", "text", "OK");
    writer.append_listen("w2", "Selection", true);
    let arguments: PropertyMap = [("animate", false)].into_iter().collect();
    writer.append_call("w2", "open", Some(arguments));
    writer.append_execute_script("", "text/javascript", "go();");
    writer.append_destroy("w2");
    let message = Message::parse(&writer.create_message().expect("serialise")).expect("parse");

    let lines: Vec<String> = message
        .operations()
        .expect("decode")
        .into_iter()
        .map(describe)
        .collect();
    assert_eq!(
        lines,
        [
            r#"create w2 Button text="OK""#,
            "listen w2 Selection=true",
            "call w2 open animate=false",
            "executeScript text/javascript (5 bytes)",
            "destroy w2",
        ]
    );
}

#[rstest]
#[case::read_failure(
    AppError::ReadInput {
        origin: String::from("input.json"),
        source: std::io::Error::other("gone"),
    },
    2
)]
#[case::rejected(AppError::Protocol(widgetwire_protocol::ProtocolError::MissingOperations), 1)]
fn exit_status_reflects_error_class(#[case] error: AppError, #[case] expected: u8) {
    assert_eq!(error.exit_status(), expected);
}

#[test]
fn help_is_written_to_stdout() {
    let mut world = TestWorld::default();
    world.run("--help");
    world.assert_exit_code(0);
    assert!(world.stdout_text().contains("inspect"));
    assert!(world.stderr_text().is_empty());
}

#[test]
fn json_report_has_one_line_per_operation() {
    let mut world = TestWorld::default();
    world.stdin = Envelope::default()
        .wrap(r#"{"operations": [{"action": "destroy", "target": "w1"}, {"action": "call", "target": "w2", "method": "m"}]}"#)
        .into_bytes();
    world.run("inspect --output json");
    world.assert_exit_code(0);

    let stdout = world.stdout_text();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(
        lines,
        [
            serde_json::json!({"action": "destroy", "target": "w1"}),
            serde_json::json!({"action": "call", "target": "w2", "method": "m", "properties": {}}),
        ]
    );
}

#[test]
fn custom_envelope_flags_are_honoured() {
    let mut world = TestWorld::default();
    world.stdin = br#"apply({"operations": []})"#.to_vec();
    world.run("inspect --output human --prefix apply( --suffix )");
    world.assert_exit_code(0);
    assert!(world.stdout_text().contains("operations: 0"));
}

// ---------------------------------------------------------------------------
// Behaviour tests
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    stdin: Vec<u8>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: Option<ExitCode>,
}

impl TestWorld {
    fn run(&mut self, command: &str) {
        self.stdout.clear();
        self.stderr.clear();
        let args = Self::build_args(command);
        let mut stdin: &[u8] = &self.stdin;
        let mut io = IoStreams::new(&mut stdin, &mut self.stdout, &mut self.stderr, false);
        self.exit_code = Some(run(args, &mut io));
    }

    fn build_args(command: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("widgetwire")];
        let trimmed = command.trim().trim_matches('"');
        if !trimmed.is_empty() {
            args.extend(trimmed.split_whitespace().map(OsString::from));
        }
        args
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }

    fn assert_exit_code(&self, expected: u8) {
        let exit = self.exit_code.expect("exit code recorded");
        assert_eq!(
            exit,
            ExitCode::from(expected),
            "stdout: {:?}, stderr: {:?}",
            self.stdout_text(),
            self.stderr_text()
        );
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

#[given("stdin holds an enveloped message creating {target} of type {type_name}")]
fn given_create_message(world: &RefCell<TestWorld>, target: String, type_name: String) {
    let mut writer = MessageWriter::new();
    writer.append_head("requestCounter", 3);
    writer.append_create(target.trim_matches('"'), type_name.trim_matches('"'));
    writer.append_listen(target.trim_matches('"'), "Selection", true);
    let json = writer.create_message().expect("serialise");
    world.borrow_mut().stdin = Envelope::default().wrap(&json).into_bytes();
}

#[given("stdin holds malformed JSON")]
fn given_malformed_json(world: &RefCell<TestWorld>) {
    world.borrow_mut().stdin = Envelope::default().wrap("{").into_bytes();
}

#[given("stdin holds a message with an unknown action")]
fn given_unknown_action(world: &RefCell<TestWorld>) {
    world.borrow_mut().stdin = br#"{"operations": [{"action": "foo"}]}"#.to_vec();
}

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: String) {
    world.borrow_mut().run(&command);
}

#[then("the CLI exits with code {status}")]
fn then_exit_code(world: &RefCell<TestWorld>, status: u8) {
    world.borrow().assert_exit_code(status);
}

#[then("stdout contains {snippet}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, snippet: String) {
    let stdout = world.borrow().stdout_text();
    let expected = snippet.trim_matches('"');
    assert!(
        stdout.contains(expected),
        "stdout {stdout:?} did not contain {expected:?}"
    );
}

#[then("stderr contains {snippet}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, snippet: String) {
    let stderr = world.borrow().stderr_text();
    let expected = snippet.trim_matches('"');
    assert!(
        stderr.contains(expected),
        "stderr {stderr:?} did not contain {expected:?}"
    );
}

#[scenario(path = "tests/features/widgetwire_cli.feature")]
fn widgetwire_cli_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
