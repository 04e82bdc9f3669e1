//! Domain errors raised while reading, querying, and writing messages.
//!
//! Failures fall into two classes. Structural failures (see
//! [`ProtocolError::is_structural`]) mean the payload cannot be trusted and
//! the whole request must be rejected before any operation is applied.
//! Lookup failures are raised by the property-level accessors when a caller
//! asserts that a value exists and it does not.

use thiserror::Error;

use crate::operation::Action;

/// Errors arising from protocol message handling.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// No payload text was supplied at all.
    #[error("payload is missing")]
    NullPayload,

    /// The payload text (after envelope removal) is not valid JSON.
    #[error("Could not parse json: {message}")]
    MalformedPayload {
        /// Human-readable description of the parse failure.
        message: String,
        /// Underlying JSON error, when one was produced.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The top-level `operations` field is absent or not an array.
    #[error("Missing operations array")]
    MissingOperations,

    /// The `head` section carries a field with an unusable value.
    #[error("invalid message head: {message}")]
    InvalidHead {
        /// Description of the offending field.
        message: String,
    },

    /// The payload exceeds the configured size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Payload size in bytes.
        size: usize,
        /// Configured limit in bytes.
        max_size: usize,
    },

    /// An operation index at or beyond the operation count was requested.
    #[error("operation index {index} out of range for message with {count} operation(s)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of operations in the message.
        count: usize,
    },

    /// The operation's `action` discriminator names no known operation kind.
    #[error("unknown action '{action}' in operation {index}")]
    UnknownAction {
        /// Position of the operation in the message.
        index: usize,
        /// The unrecognised discriminator.
        action: String,
    },

    /// The operation entry does not have the shape its action requires.
    #[error("malformed operation {index}: {message}")]
    MalformedOperation {
        /// Position of the operation in the message.
        index: usize,
        /// Description of the shape violation.
        message: String,
    },

    /// A property-level find found no operation to read the property from.
    #[error("{action} property '{name}' for target '{target}' not found")]
    PropertyLookupFailed {
        /// Kind of operation that was searched for.
        action: Action,
        /// Target identifier that was searched for.
        target: String,
        /// Property that was requested.
        name: String,
    },

    /// An operation exists but does not carry the requested property.
    #[error("property '{name}' not found on operation for target '{target}'")]
    PropertyNotFound {
        /// Target of the operation that was queried.
        target: String,
        /// Property that was requested.
        name: String,
    },

    /// A property accessor was used on an operation kind without properties.
    #[error("{action} operations do not support {operation}")]
    UnsupportedOperation {
        /// Kind of operation that was queried.
        action: Action,
        /// Name of the unsupported accessor.
        operation: &'static str,
    },

    /// The outgoing message could not be serialised.
    #[error("failed to serialise message: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Returns `true` when the error invalidates the whole message.
    ///
    /// Callers receiving a structural error must reject the request without
    /// applying any of its operations.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        match self {
            Self::NullPayload
            | Self::MalformedPayload { .. }
            | Self::MissingOperations
            | Self::InvalidHead { .. }
            | Self::RequestTooLarge { .. }
            | Self::IndexOutOfRange { .. }
            | Self::UnknownAction { .. }
            | Self::MalformedOperation { .. } => true,
            Self::PropertyLookupFailed { .. }
            | Self::PropertyNotFound { .. }
            | Self::UnsupportedOperation { .. }
            | Self::Serialize(_) => false,
        }
    }

    /// Creates a malformed payload error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed payload error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid head error.
    #[must_use]
    pub fn invalid_head(message: impl Into<String>) -> Self {
        Self::InvalidHead {
            message: message.into(),
        }
    }

    /// Creates an unknown action error.
    #[must_use]
    pub fn unknown_action(index: usize, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            index,
            action: action.into(),
        }
    }

    /// Creates a malformed operation error.
    #[must_use]
    pub fn malformed_operation(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedOperation {
            index,
            message: message.into(),
        }
    }

    /// Creates a property lookup failure for a property-level find.
    #[must_use]
    pub fn lookup_failed(action: Action, target: &str, name: &str) -> Self {
        Self::PropertyLookupFailed {
            action,
            target: target.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Creates a property-not-found error for an existing operation.
    #[must_use]
    pub fn property_not_found(target: &str, name: &str) -> Self {
        Self::PropertyNotFound {
            target: target.to_owned(),
            name: name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests;
