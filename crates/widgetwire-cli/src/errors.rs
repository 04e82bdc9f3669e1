//! Error types for the CLI runtime.

use std::io;

use thiserror::Error;
use widgetwire_protocol::ProtocolError;

use crate::telemetry::TelemetryError;

/// Exit status for protocol rejections and usage errors.
const EXIT_REJECTED: u8 = 1;
/// Exit status for failures reading input or writing the report.
const EXIT_IO: u8 = 2;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to configure logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read {origin}: {source}")]
    ReadInput {
        origin: String,
        #[source]
        source: io::Error,
    },
    #[error("message rejected: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("failed to serialise operation: {0}")]
    SerialiseOperation(serde_json::Error),
    #[error("failed to write report: {0}")]
    WriteReport(#[source] io::Error),
}

impl AppError {
    /// Maps the error onto the process exit status.
    pub(crate) const fn exit_status(&self) -> u8 {
        match self {
            Self::ReadInput { .. } | Self::WriteReport(_) => EXIT_IO,
            Self::CliUsage(_)
            | Self::Telemetry(_)
            | Self::Protocol(_)
            | Self::SerialiseOperation(_) => EXIT_REJECTED,
        }
    }
}
