//! CLI entrypoint for the widgetwire message inspector.
//!
//! The binary delegates to [`widgetwire_cli::run`] with the process streams.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use widgetwire_cli::IoStreams;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let mut streams = IoStreams::new(&mut stdin, &mut stdout, &mut stderr, stdout_is_terminal);
    widgetwire_cli::run(std::env::args_os(), &mut streams)
}
