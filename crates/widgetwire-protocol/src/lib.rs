//! Wire protocol for remote widget user interfaces.
//!
//! A server drives a widget tree that lives on a remote client. Each
//! processing turn produces one JSON message: a `head` object carrying
//! metadata such as `requestCounter`, and an ordered `operations` array that
//! creates, updates, listens on, calls, scripts, and destroys widgets.
//!
//! The crate has two halves:
//!
//! - [`MessageWriter`] accumulates operations for one turn, merging
//!   consecutive property assignments to the same widget, and serialises
//!   them with [`MessageWriter::create_message`].
//! - [`Message`] parses an incoming payload, optionally wrapped in a script
//!   [`Envelope`], and answers queries about it. Operations are decoded on
//!   first access; the `find_*_operation` methods return `Ok(None)` when
//!   nothing matches while the `find_*_property` methods fail.
//!
//! [`apply_message`] feeds a parsed message to an [`OperationHandler`] in
//! sequence order, refusing messages that contain undecodable operations.
//!
//! # Example
//!
//! ```rust
//! use widgetwire_protocol::{Message, MessageWriter, PropertyValue};
//!
//! let mut writer = MessageWriter::new();
//! writer.append_head("requestCounter", 7);
//! writer.append_create("w2", "Button");
//! writer.append_set("w2", "text", "OK");
//! writer.append_listen("w2", "Selection", true);
//! let text = writer.create_message().expect("serialise");
//!
//! let message = Message::parse(&text).expect("parse");
//! assert_eq!(message.request_counter(), 7);
//! assert_eq!(message.operation_count(), 2);
//! assert_eq!(
//!     message.find_create_property("w2", "text").expect("initial text"),
//!     &PropertyValue::from("OK")
//! );
//! ```

pub mod apply;
pub mod config;
pub mod envelope;
pub mod error;
pub mod message;
pub mod operation;
pub mod property;
pub mod writer;

#[cfg(test)]
mod tests;

pub use self::apply::{ApplyError, OperationHandler, apply_message};
pub use self::config::ReaderConfig;
pub use self::envelope::Envelope;
pub use self::error::ProtocolError;
pub use self::message::Message;
pub use self::operation::{
    Action, CallOperation, CreateOperation, DestroyOperation, ExecuteScriptOperation,
    ListenOperation, Operation, PropertyOperation, SetOperation,
};
pub use self::property::{PropertyMap, PropertyValue};
pub use self::writer::MessageWriter;
