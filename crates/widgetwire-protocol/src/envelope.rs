//! Function-call envelope around the JSON document.
//!
//! Some integrations deliver the message as a script fragment of the form
//! `PREFIX <json> SUFFIX`. The reader accepts both that form and the bare
//! JSON object.

use serde::{Deserialize, Serialize};

/// Default opening marker of the enveloped form.
pub const DEFAULT_PREFIX: &str = "org.eclipse.rwt.protocol.Processor.processMessage( ";

/// Default closing marker of the enveloped form.
pub const DEFAULT_SUFFIX: &str = " );";

/// Prefix and suffix markers surrounding an enveloped message.
///
/// # Example
///
/// ```
/// use widgetwire_protocol::Envelope;
///
/// let envelope = Envelope::default();
/// let wrapped = envelope.wrap(r#"{"operations":[]}"#);
/// assert_eq!(envelope.unwrap(&wrapped), r#"{"operations":[]}"#);
/// assert_eq!(envelope.unwrap(r#" {"operations":[]} "#), r#"{"operations":[]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    prefix: String,
    suffix: String,
}

impl Envelope {
    /// Creates an envelope with custom markers.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Returns the opening marker.
    #[must_use]
    pub const fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// Returns the closing marker.
    #[must_use]
    pub const fn suffix(&self) -> &str {
        self.suffix.as_str()
    }

    /// Surrounds `json` with the envelope markers.
    #[must_use]
    pub fn wrap(&self, json: &str) -> String {
        format!("{}{json}{}", self.prefix, self.suffix)
    }

    /// Extracts the JSON document from `text`.
    ///
    /// Surrounding whitespace is ignored. The markers are only removed when
    /// both are present; otherwise the trimmed text is returned unchanged.
    #[must_use]
    pub fn unwrap<'a>(&self, text: &'a str) -> &'a str {
        let trimmed = text.trim();
        trimmed
            .strip_prefix(self.prefix.trim_start())
            .and_then(|rest| rest.strip_suffix(self.suffix.trim_end()))
            .map_or(trimmed, str::trim)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}
