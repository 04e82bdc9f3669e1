//! Reader configuration for payload limits and envelope markers.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// Default upper bound on payload size accepted by the reader (4 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Settings applied when parsing incoming messages.
///
/// Missing fields take their defaults when deserialised, so a host
/// application can embed this in its own configuration file.
///
/// # Defaults
///
/// - `envelope`: [`Envelope::default`]
/// - `max_payload_bytes`: 4 194 304 (4 MiB)
///
/// # Example
///
/// ```
/// use widgetwire_protocol::ReaderConfig;
///
/// let config: ReaderConfig =
///     serde_json::from_str(r#"{"max_payload_bytes": 1024}"#).expect("config");
/// assert_eq!(config.max_payload_bytes(), 1024);
/// assert_eq!(config.envelope().suffix(), " );");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    envelope: Envelope,
    max_payload_bytes: usize,
}

impl ReaderConfig {
    /// Replaces the envelope markers.
    #[must_use]
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Replaces the payload size limit.
    #[must_use]
    pub const fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    /// Returns the envelope markers.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Returns the payload size limit in bytes.
    #[must_use]
    pub const fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            envelope: Envelope::default(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}
