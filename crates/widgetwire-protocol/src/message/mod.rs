//! Incoming message parsing and querying.
//!
//! [`Message`] validates the overall document at construction time and then
//! decodes individual operations on first access. Structural problems with
//! the document surface from the constructor; a malformed operation surfaces
//! when that operation is first read, whether directly or through a find.
//!
//! Lookups come in two tiers. The `find_*_operation` methods probe: they
//! return `Ok(None)` when nothing matches. The `find_*_property` methods
//! assert: they fail with [`ProtocolError::PropertyLookupFailed`] when the
//! corresponding probe finds nothing.

use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::error::ProtocolError;
use crate::operation::{
    Action, CallOperation, CreateOperation, ListenOperation, Operation, PropertyOperation,
    SetOperation,
};
use crate::property::PropertyValue;

/// A parsed, immutable incoming message.
///
/// Decoded operations are cached, so repeated access is cheap and a
/// `Message` can be shared between threads for reading.
///
/// # Example
///
/// ```
/// use widgetwire_protocol::{Message, PropertyValue};
///
/// let message = Message::parse(
///     r#"{ "head": { "requestCounter": 4 },
///          "operations": [ { "action": "set", "target": "w1",
///                            "properties": { "text": "hi" } } ] }"#,
/// )
/// .expect("valid message");
///
/// assert_eq!(message.request_counter(), 4);
/// assert!(message.find_set_operation("w1", "text").expect("decodes").is_some());
/// assert!(message.find_set_operation("w1", "other").expect("decodes").is_none());
/// assert_eq!(
///     message.find_set_property("w1", "text").expect("present"),
///     &PropertyValue::from("hi")
/// );
/// assert!(message.find_set_property("w2", "text").is_err());
/// ```
#[derive(Debug)]
pub struct Message {
    request_counter: u64,
    raw_operations: Vec<Value>,
    decoded: Vec<OnceCell<Operation>>,
}

impl Message {
    /// Parses a payload using the default [`ReaderConfig`].
    ///
    /// # Errors
    ///
    /// See [`Message::parse_with`].
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Self::parse_with(text, &ReaderConfig::default())
    }

    /// Parses a payload that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NullPayload`] for `None`, otherwise see
    /// [`Message::parse_with`].
    pub fn from_payload(text: Option<&str>) -> Result<Self, ProtocolError> {
        text.map_or(Err(ProtocolError::NullPayload), Self::parse)
    }

    /// Parses a payload, bare or enveloped, using `config`.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::RequestTooLarge`] when the text exceeds the limit.
    /// - [`ProtocolError::MalformedPayload`] when the document is not JSON.
    /// - [`ProtocolError::MissingOperations`] when `operations` is absent or
    ///   not an array.
    /// - [`ProtocolError::InvalidHead`] when `head.requestCounter` is present
    ///   but not a non-negative integer.
    pub fn parse_with(text: &str, config: &ReaderConfig) -> Result<Self, ProtocolError> {
        Self::decode_document(text, config).inspect_err(|error| {
            warn!(%error, size = text.len(), "rejected incoming message");
        })
    }

    fn decode_document(text: &str, config: &ReaderConfig) -> Result<Self, ProtocolError> {
        if text.len() > config.max_payload_bytes() {
            return Err(ProtocolError::RequestTooLarge {
                size: text.len(),
                max_size: config.max_payload_bytes(),
            });
        }

        let json = config.envelope().unwrap(text);
        let mut document: Value =
            serde_json::from_str(json).map_err(ProtocolError::from_json_error)?;

        let raw_operations = match document.get_mut("operations").map(Value::take) {
            Some(Value::Array(operations)) => operations,
            _ => return Err(ProtocolError::MissingOperations),
        };
        let request_counter = read_request_counter(&document)?;
        let decoded = raw_operations.iter().map(|_| OnceCell::new()).collect();

        debug!(
            operations = raw_operations.len(),
            request_counter, "parsed incoming message"
        );
        Ok(Self {
            request_counter,
            raw_operations,
            decoded,
        })
    }

    /// Returns the request counter from the head, or 0 when absent.
    #[must_use]
    pub const fn request_counter(&self) -> u64 {
        self.request_counter
    }

    /// Returns the number of operations, decoded or not.
    #[must_use]
    pub const fn operation_count(&self) -> usize {
        self.raw_operations.len()
    }

    /// Returns the operation at `index`, decoding it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IndexOutOfRange`] when `index` is not below
    /// [`operation_count`](Self::operation_count), and
    /// [`ProtocolError::UnknownAction`] or
    /// [`ProtocolError::MalformedOperation`] when the entry cannot be decoded.
    pub fn operation(&self, index: usize) -> Result<&Operation, ProtocolError> {
        let (raw, slot) = self
            .raw_operations
            .get(index)
            .zip(self.decoded.get(index))
            .ok_or(ProtocolError::IndexOutOfRange {
                index,
                count: self.operation_count(),
            })?;
        slot.get_or_try_init(|| Operation::decode(index, raw))
    }

    /// Decodes every operation, in application order.
    ///
    /// # Errors
    ///
    /// Returns the first decoding error encountered.
    pub fn operations(&self) -> Result<Vec<&Operation>, ProtocolError> {
        (0..self.operation_count())
            .map(|index| self.operation(index))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Operation tier: probe, `Ok(None)` when nothing matches
    // -----------------------------------------------------------------------

    /// Finds the first create operation for `target`.
    ///
    /// # Errors
    ///
    /// Fails only when an operation scanned before a match cannot be decoded.
    pub fn find_create_operation(
        &self,
        target: &str,
    ) -> Result<Option<&CreateOperation>, ProtocolError> {
        self.first_match(|operation| {
            operation
                .as_create()
                .filter(|create| create.target() == target)
        })
    }

    /// Finds the first set operation for `target` that assigns `name`.
    ///
    /// # Errors
    ///
    /// Fails only when an operation scanned before a match cannot be decoded.
    pub fn find_set_operation(
        &self,
        target: &str,
        name: &str,
    ) -> Result<Option<&SetOperation>, ProtocolError> {
        self.first_match(|operation| {
            operation
                .as_set()
                .filter(|set| set.target() == target && set.has_property(name))
        })
    }

    /// Finds the first listen operation for `target` that mentions `event`.
    ///
    /// # Errors
    ///
    /// Fails only when an operation scanned before a match cannot be decoded.
    pub fn find_listen_operation(
        &self,
        target: &str,
        event: &str,
    ) -> Result<Option<&ListenOperation>, ProtocolError> {
        self.first_match(|operation| {
            operation
                .as_listen()
                .filter(|listen| listen.target() == target && listen.has_property(event))
        })
    }

    /// Finds the first call of `method_name` on `target`.
    ///
    /// # Errors
    ///
    /// Fails only when an operation scanned before a match cannot be decoded.
    pub fn find_call_operation(
        &self,
        target: &str,
        method_name: &str,
    ) -> Result<Option<&CallOperation>, ProtocolError> {
        self.first_match(|operation| {
            operation
                .as_call()
                .filter(|call| call.target() == target && call.method_name() == method_name)
        })
    }

    // -----------------------------------------------------------------------
    // Property tier: assert, error when the operation is missing
    // -----------------------------------------------------------------------

    /// Returns the value assigned to `name` by the first matching set.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PropertyLookupFailed`] when no set operation
    /// for `target` assigns `name`.
    pub fn find_set_property(
        &self,
        target: &str,
        name: &str,
    ) -> Result<&PropertyValue, ProtocolError> {
        let operation = self.find_set_operation(target, name)?;
        require_property(operation, Action::Set, target, name)
    }

    /// Returns the flag for `event` from the first matching listen.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PropertyLookupFailed`] when no listen
    /// operation for `target` mentions `event`.
    pub fn find_listen_property(
        &self,
        target: &str,
        event: &str,
    ) -> Result<&PropertyValue, ProtocolError> {
        let operation = self.find_listen_operation(target, event)?;
        require_property(operation, Action::Listen, target, event)
    }

    /// Returns the initial value of `name` from the create for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PropertyLookupFailed`] when there is no
    /// create operation for `target`, and
    /// [`ProtocolError::PropertyNotFound`] when it does not carry `name`.
    pub fn find_create_property(
        &self,
        target: &str,
        name: &str,
    ) -> Result<&PropertyValue, ProtocolError> {
        let operation = self.find_create_operation(target)?;
        require_property(operation, Action::Create, target, name)
    }

    fn first_match<'a, T, F>(&'a self, select: F) -> Result<Option<&'a T>, ProtocolError>
    where
        F: Fn(&'a Operation) -> Option<&'a T>,
    {
        for index in 0..self.operation_count() {
            if let Some(found) = select(self.operation(index)?) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Unwraps a probe result, turning absence into a lookup failure.
fn require_property<'a, T: PropertyOperation>(
    operation: Option<&'a T>,
    action: Action,
    target: &str,
    name: &str,
) -> Result<&'a PropertyValue, ProtocolError> {
    operation
        .ok_or_else(|| ProtocolError::lookup_failed(action, target, name))?
        .property(name)
}

fn read_request_counter(document: &Value) -> Result<u64, ProtocolError> {
    match document.pointer("/head/requestCounter") {
        None => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| {
            ProtocolError::invalid_head(format!(
                "requestCounter must be a non-negative integer, got {value}"
            ))
        }),
    }
}
