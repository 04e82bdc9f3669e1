//! Command-line runtime for inspecting widget protocol messages.
//!
//! `widgetwire inspect [PATH]` reads a message, bare or enveloped, from a
//! file or standard input and reports its request counter and operations.
//! The runtime takes its IO streams as parameters so tests can drive it with
//! in-memory buffers.
//!
//! Exit status is 0 on success, 1 when the message is rejected or the
//! arguments are invalid, and 2 when input cannot be read or the report
//! cannot be written.

use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use widgetwire_protocol::Message;

mod cli;
mod errors;
pub mod logging;
mod output;
pub mod telemetry;

use cli::{Cli, CliCommand, InspectArgs};
pub use cli::{OutputFormat, ResolvedOutputFormat};
use errors::AppError;

/// Bundles the IO streams provided to the CLI runtime.
pub struct IoStreams<'a, R: Read, W: Write, E: Write> {
    stdin: &'a mut R,
    stdout: &'a mut W,
    stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, R: Read, W: Write, E: Write> IoStreams<'a, R, W, E> {
    /// Wraps the given streams.
    ///
    /// `stdout_is_terminal` decides what `--output auto` resolves to.
    #[must_use]
    pub const fn new(
        stdin: &'a mut R,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, io: &mut IoStreams<'_, R, W, E>) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // Help and version requests are successful output.
            let _ = write!(io.stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => return report_failure(&AppError::CliUsage(error), io.stderr),
    };

    match execute(&cli, io) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error, io.stderr),
    }
}

fn execute<R, W, E>(cli: &Cli, io: &mut IoStreams<'_, R, W, E>) -> Result<(), AppError>
where
    R: Read,
    W: Write,
    E: Write,
{
    telemetry::initialise(&cli.log_filter, cli.log_format)?;
    let format = cli.output.resolve(io.stdout_is_terminal);

    match &cli.command {
        CliCommand::Inspect(args) => {
            let payload = read_payload(args, io.stdin)?;
            let message = Message::parse_with(&payload, &args.reader_config())?;
            debug!(
                operations = message.operation_count(),
                "inspecting message"
            );
            output::render_report(&message, format, io.stdout)
        }
    }
}

fn read_payload<R: Read>(args: &InspectArgs, stdin: &mut R) -> Result<String, AppError> {
    match args.input_path() {
        Some(path) => fs::read_to_string(path).map_err(|source| AppError::ReadInput {
            origin: path.display().to_string(),
            source,
        }),
        None => {
            let mut payload = String::new();
            stdin
                .read_to_string(&mut payload)
                .map_err(|source| AppError::ReadInput {
                    origin: String::from("standard input"),
                    source,
                })?;
            Ok(payload)
        }
    }
}

fn report_failure<E: Write>(error: &AppError, stderr: &mut E) -> ExitCode {
    let _ = writeln!(stderr, "widgetwire: {error}");
    ExitCode::from(error.exit_status())
}

#[cfg(test)]
mod tests;
