//! Ordered application of a message to a widget tree.
//!
//! Operations must be applied strictly in sequence order. A message whose
//! operations cannot all be decoded is rejected before any of them reaches
//! the handler, so a receiver never sees half of a broken turn.

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::message::Message;
use crate::operation::Operation;

/// Errors raised while applying a message.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The message contained an operation that could not be decoded.
    #[error("message rejected: {0}")]
    Rejected(#[source] ProtocolError),

    /// A handler refused an operation. Returned by handlers.
    #[error("{message}")]
    Refused {
        /// Reason given by the handler.
        message: String,
    },

    /// Application stopped because the handler failed on an operation.
    #[error("operation {index} for target '{target}' failed: {message}")]
    Handler {
        /// Position of the failing operation.
        index: usize,
        /// Widget the operation addressed.
        target: String,
        /// Failure reported by the handler.
        message: String,
    },
}

impl ApplyError {
    /// Creates an [`ApplyError::Refused`] for use inside a handler.
    #[must_use]
    pub fn refused(message: impl Into<String>) -> Self {
        Self::Refused {
            message: message.into(),
        }
    }
}

impl From<ProtocolError> for ApplyError {
    fn from(error: ProtocolError) -> Self {
        Self::Rejected(error)
    }
}

/// Receives decoded operations in application order.
pub trait OperationHandler {
    /// Applies a single operation.
    ///
    /// # Errors
    ///
    /// Returns an error to stop application at this operation.
    fn handle(&mut self, operation: &Operation) -> Result<(), ApplyError>;
}

/// Applies every operation of `message` to `handler`, in order.
///
/// Returns the number of operations applied.
///
/// # Errors
///
/// Returns [`ApplyError::Rejected`] without calling the handler when any
/// operation fails to decode, and [`ApplyError::Handler`] for the first
/// operation the handler fails on. Operations after it are not applied.
pub fn apply_message<H>(message: &Message, handler: &mut H) -> Result<usize, ApplyError>
where
    H: OperationHandler + ?Sized,
{
    let operations = message.operations()?;

    for (index, operation) in operations.iter().enumerate() {
        handler.handle(operation).map_err(|error| {
            warn!(index, id = operation.target(), %error, "operation failed");
            ApplyError::Handler {
                index,
                target: operation.target().to_owned(),
                message: error.to_string(),
            }
        })?;
    }

    debug!(
        applied = operations.len(),
        request_counter = message.request_counter(),
        "applied message"
    );
    Ok(operations.len())
}
