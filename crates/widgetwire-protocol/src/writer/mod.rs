//! Outgoing message construction.
//!
//! A [`MessageWriter`] is created for one processing turn, receives
//! operations in the order they should be applied, and is serialised once
//! with [`MessageWriter::create_message`].

use serde::Serialize;
use tracing::trace;

use crate::error::ProtocolError;
use crate::operation::{
    Action, CallOperation, CreateOperation, DestroyOperation, ExecuteScriptOperation,
    ListenOperation, Operation, PropertyOperation, SetOperation,
};
use crate::property::{PropertyMap, PropertyValue};

/// Accumulates operations for one outgoing message.
///
/// Consecutive property assignments to the same target are merged: a
/// [`append_set`](Self::append_set) extends the most recent operation when it
/// is a set or create for the same target, and
/// [`append_listen`](Self::append_listen) extends the most recent operation
/// when it is a listen for the same target. Any other append in between
/// starts a new operation.
///
/// # Example
///
/// ```
/// use widgetwire_protocol::{Message, MessageWriter};
///
/// let mut writer = MessageWriter::new();
/// writer.append_set("w1", "key", true);
/// writer.append_set("w1", "key2", "value");
/// let text = writer.create_message().expect("serialise");
///
/// let message = Message::parse(&text).expect("parse");
/// assert_eq!(message.operation_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageWriter {
    head: PropertyMap,
    operations: Vec<Operation>,
}

/// Borrowed wire shape of a message.
#[derive(Serialize)]
struct WireMessage<'a> {
    head: &'a PropertyMap,
    operations: &'a [Operation],
}

impl MessageWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: PropertyMap::new(),
            operations: Vec::new(),
        }
    }

    /// Sets a field in the message head, such as `requestCounter`.
    pub fn append_head(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.head.insert(name, value);
    }

    /// Appends a create operation.
    pub fn append_create(&mut self, target: impl Into<String>, type_name: impl Into<String>) {
        self.push(Operation::Create(CreateOperation::new(target, type_name)));
    }

    /// Appends a destroy operation.
    pub fn append_destroy(&mut self, target: impl Into<String>) {
        self.push(Operation::Destroy(DestroyOperation::new(target)));
    }

    /// Assigns a property, merging into a pending set or create for `target`.
    pub fn append_set(
        &mut self,
        target: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        let target_id = target.into();
        if let Some(properties) = self.mergeable_properties(&target_id, Action::Set) {
            properties.insert(name, value);
            return;
        }
        let mut properties = PropertyMap::new();
        properties.insert(name, value);
        self.push(Operation::Set(SetOperation::new(target_id, properties)));
    }

    /// Sets an event flag, merging into a pending listen for `target`.
    pub fn append_listen(
        &mut self,
        target: impl Into<String>,
        event: impl Into<String>,
        enabled: bool,
    ) {
        let target_id = target.into();
        if let Some(properties) = self.mergeable_properties(&target_id, Action::Listen) {
            properties.insert(event, enabled);
            return;
        }
        let mut properties = PropertyMap::new();
        properties.insert(event, enabled);
        self.push(Operation::Listen(ListenOperation::new(target_id, properties)));
    }

    /// Appends a method call; `None` yields a call without arguments.
    pub fn append_call(
        &mut self,
        target: impl Into<String>,
        method_name: impl Into<String>,
        properties: Option<PropertyMap>,
    ) {
        self.push(Operation::Call(CallOperation::new(
            target,
            method_name,
            properties.unwrap_or_default(),
        )));
    }

    /// Appends a script for the client to evaluate.
    pub fn append_execute_script(
        &mut self,
        target: impl Into<String>,
        script_type: impl Into<String>,
        script: impl Into<String>,
    ) {
        self.push(Operation::ExecuteScript(ExecuteScriptOperation::new(
            target,
            script_type,
            script,
        )));
    }

    /// Returns the number of operations accumulated so far.
    #[must_use]
    pub const fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` when no operation has been appended.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Serialises the head and operations, in append order, to JSON text.
    ///
    /// The writer is left untouched, so calling this twice yields the same
    /// text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Serialize`] if JSON serialisation fails.
    pub fn create_message(&self) -> Result<String, ProtocolError> {
        let wire = WireMessage {
            head: &self.head,
            operations: &self.operations,
        };
        serde_json::to_string(&wire).map_err(ProtocolError::Serialize)
    }

    fn push(&mut self, operation: Operation) {
        trace!(
            action = %operation.action(),
            id = operation.target(),
            position = self.operations.len(),
            "appending operation"
        );
        self.operations.push(operation);
    }

    fn mergeable_properties(&mut self, target: &str, action: Action) -> Option<&mut PropertyMap> {
        let mergeable = match self.operations.last()? {
            Operation::Set(pending) => action == Action::Set && pending.target() == target,
            Operation::Create(pending) => action == Action::Set && pending.target() == target,
            Operation::Listen(pending) => action == Action::Listen && pending.target() == target,
            _ => false,
        };
        if !mergeable {
            return None;
        }
        match self.operations.last_mut()? {
            Operation::Set(pending) => Some(pending.properties_mut()),
            Operation::Create(pending) => Some(pending.properties_mut()),
            Operation::Listen(pending) => Some(pending.properties_mut()),
            _ => None,
        }
    }
}
