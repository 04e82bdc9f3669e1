//! Unit tests for protocol error types.

use rstest::rstest;

use super::*;

#[test]
fn malformed_payload_mentions_json() {
    let error = ProtocolError::malformed("unexpected end of input");
    let message = error.to_string();
    assert!(
        message.contains("Could not parse json"),
        "expected parse marker in message: {message}"
    );
    assert!(
        message.contains("unexpected end of input"),
        "expected detail in message: {message}"
    );
}

#[test]
fn missing_operations_message_is_stable() {
    assert_eq!(
        ProtocolError::MissingOperations.to_string(),
        "Missing operations array"
    );
}

#[rstest]
#[case::too_large(
    ProtocolError::RequestTooLarge { size: 2048, max_size: 1024 },
    "2048"
)]
#[case::out_of_range(
    ProtocolError::IndexOutOfRange { index: 7, count: 3 },
    "7"
)]
#[case::malformed_operation(ProtocolError::malformed_operation(4, "missing field `target`"), "4")]
fn error_message_includes_numeric_field(
    #[case] error: ProtocolError,
    #[case] expected_value: &str,
) {
    let message = error.to_string();
    assert!(
        message.contains(expected_value),
        "expected {expected_value} in message: {message}"
    );
}

#[test]
fn unknown_action_includes_discriminator() {
    let message = ProtocolError::unknown_action(0, "foo").to_string();
    assert!(message.contains("'foo'"), "expected action in: {message}");
}

#[test]
fn lookup_failed_names_target_and_property() {
    let message = ProtocolError::lookup_failed(Action::Set, "w2", "key1").to_string();
    assert!(message.contains("set"), "expected action in: {message}");
    assert!(message.contains("w2"), "expected target in: {message}");
    assert!(message.contains("key1"), "expected name in: {message}");
    assert!(message.contains("not found"), "expected marker in: {message}");
}

#[test]
fn unsupported_operation_names_action() {
    let error = ProtocolError::UnsupportedOperation {
        action: Action::ExecuteScript,
        operation: "property_names",
    };
    let message = error.to_string();
    assert!(message.contains("executeScript"), "unexpected: {message}");
    assert!(message.contains("property_names"), "unexpected: {message}");
}

#[rstest]
#[case::null(ProtocolError::NullPayload, true)]
#[case::malformed(ProtocolError::malformed("x"), true)]
#[case::missing(ProtocolError::MissingOperations, true)]
#[case::head(ProtocolError::invalid_head("requestCounter"), true)]
#[case::index(ProtocolError::IndexOutOfRange { index: 1, count: 1 }, true)]
#[case::action(ProtocolError::unknown_action(0, "foo"), true)]
#[case::lookup(ProtocolError::lookup_failed(Action::Listen, "w1", "e"), false)]
#[case::property(ProtocolError::property_not_found("w1", "bar"), false)]
#[case::unsupported(
    ProtocolError::UnsupportedOperation { action: Action::Destroy, operation: "property" },
    false
)]
fn classifies_structural_errors(#[case] error: ProtocolError, #[case] structural: bool) {
    assert_eq!(error.is_structural(), structural, "for {error}");
}

#[test]
fn protocol_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProtocolError>();
}
