//! CLI argument definitions for the widgetwire tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use widgetwire_protocol::config::DEFAULT_MAX_PAYLOAD_BYTES;
use widgetwire_protocol::envelope::{DEFAULT_PREFIX, DEFAULT_SUFFIX};
use widgetwire_protocol::{Envelope, ReaderConfig};

use crate::logging::LogFormat;

/// Output format selection for inspection reports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit one JSON object per operation.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Human-readable summary lines.
    Human,
    /// JSON lines.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Human => ResolvedOutputFormat::Human,
        }
    }
}

/// Command-line interface for inspecting widget protocol messages.
#[derive(Parser, Debug)]
#[command(name = "widgetwire", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Tracing filter directives for diagnostics on stderr.
    #[arg(long, global = true, default_value = "warn")]
    pub(crate) log_filter: String,
    /// Format of diagnostics on stderr (`json` or `compact`).
    #[arg(long, global = true, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
    /// Controls how reports are rendered.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// The command to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands for the widgetwire CLI.
#[derive(Subcommand, Debug)]
pub(crate) enum CliCommand {
    /// Parses a message and lists its operations.
    Inspect(InspectArgs),
}

/// Arguments for `widgetwire inspect`.
#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// Message file to read; standard input when omitted or `-`.
    #[arg(value_name = "PATH")]
    pub(crate) path: Option<PathBuf>,
    /// Largest payload accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
    pub(crate) max_payload_bytes: usize,
    /// Opening marker of an enveloped payload.
    #[arg(long, default_value = DEFAULT_PREFIX, allow_hyphen_values = true)]
    pub(crate) prefix: String,
    /// Closing marker of an enveloped payload.
    #[arg(long, default_value = DEFAULT_SUFFIX, allow_hyphen_values = true)]
    pub(crate) suffix: String,
}

impl InspectArgs {
    /// Builds the reader configuration described by the flags.
    pub(crate) fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::default()
            .with_envelope(Envelope::new(self.prefix.as_str(), self.suffix.as_str()))
            .with_max_payload_bytes(self.max_payload_bytes)
    }

    /// Returns the input path, or `None` for standard input.
    pub(crate) fn input_path(&self) -> Option<&PathBuf> {
        self.path.as_ref().filter(|path| path.as_os_str() != "-")
    }
}
