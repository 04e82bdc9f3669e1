//! Crate-level integration and BDD tests.

use crate::apply::{ApplyError, OperationHandler, apply_message};
use crate::envelope::Envelope;
use crate::message::Message;
use crate::operation::Operation;
use crate::property::{PropertyMap, PropertyValue};
use crate::writer::MessageWriter;


/// Handler that records `"<action> <target>"` for every operation.
#[derive(Default)]
struct Recorder {
    visited: Vec<String>,
}

impl OperationHandler for Recorder {
    fn handle(&mut self, operation: &Operation) -> Result<(), ApplyError> {
        self.visited
            .push(format!("{} {}", operation.action(), operation.target()));
        Ok(())
    }
}

#[test]
fn end_to_end_turn_through_envelope() {
    let mut writer = MessageWriter::new();
    writer.append_head("requestCounter", 12);
    writer.append_create("w2", "Shell");
    writer.append_set("w2", "bounds", vec![0, 0, 640, 480]);
    writer.append_listen("w2", "Close", true);
    let arguments: PropertyMap = [("animate", false)].into_iter().collect();
    writer.append_call("w2", "open", Some(arguments));
    writer.append_execute_script("w2", "text/javascript", "window.focus();");

    let json = writer.create_message().expect("serialise");
    let message = Message::parse(&Envelope::default().wrap(&json)).expect("parse");
    assert_eq!(message.request_counter(), 12);

    let bounds = message
        .find_create_property("w2", "bounds")
        .expect("bounds set at creation");
    assert_eq!(
        bounds.as_list().map(<[PropertyValue]>::len),
        Some(4),
        "unexpected bounds: {bounds}"
    );
    assert!(
        message
            .find_call_operation("w2", "open")
            .expect("decodes")
            .is_some()
    );

    let mut recorder = Recorder::default();
    let applied = apply_message(&message, &mut recorder).expect("apply");
    assert_eq!(applied, 4);
    assert_eq!(
        recorder.visited,
        ["create w2", "listen w2", "call w2", "executeScript w2"]
    );
}
