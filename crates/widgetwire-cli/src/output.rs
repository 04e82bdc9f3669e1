//! Report rendering for `widgetwire inspect`.
//!
//! Human output starts with the request counter and operation count and then
//! lists one operation per line. JSON output writes each operation as a
//! single-line object in wire form, suitable for `jq`.

use std::io::Write;

use widgetwire_protocol::{Message, Operation, PropertyMap, PropertyOperation};

use crate::cli::ResolvedOutputFormat;
use crate::errors::AppError;

/// Writes the inspection report for `message` in the requested format.
///
/// Operations are decoded in order; the first one that fails to decode ends
/// the report with an error after the preceding lines have been written.
pub(crate) fn render_report<W: Write>(
    message: &Message,
    format: ResolvedOutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    if format == ResolvedOutputFormat::Human {
        writeln!(out, "request counter: {}", message.request_counter())
            .and_then(|()| writeln!(out, "operations: {}", message.operation_count()))
            .map_err(AppError::WriteReport)?;
    }

    for index in 0..message.operation_count() {
        let operation = message.operation(index)?;
        match format {
            ResolvedOutputFormat::Human => {
                writeln!(out, "{index:>4} {}", describe(operation)).map_err(AppError::WriteReport)?;
            }
            ResolvedOutputFormat::Json => {
                serde_json::to_writer(&mut *out, operation)
                    .map_err(AppError::SerialiseOperation)?;
                out.write_all(b"\n").map_err(AppError::WriteReport)?;
            }
        }
    }
    out.flush().map_err(AppError::WriteReport)
}

/// Summarises one operation on a single line.
pub(crate) fn describe(operation: &Operation) -> String {
    let mut parts = vec![operation.action().to_string(), operation.target().to_owned()];
    match operation {
        Operation::Create(create) => {
            parts.push(create.type_name().to_owned());
            parts.extend(property_parts(create.properties()));
        }
        Operation::Call(call) => {
            parts.push(call.method_name().to_owned());
            parts.extend(property_parts(call.properties()));
        }
        Operation::Set(set) => parts.extend(property_parts(set.properties())),
        Operation::Listen(listen) => parts.extend(property_parts(listen.properties())),
        Operation::ExecuteScript(script) => {
            parts.push(script.script_type().to_owned());
            parts.push(format!("({} bytes)", script.script().len()));
        }
        Operation::Destroy(_) => {}
    }
    parts.retain(|part| !part.is_empty());
    parts.join(" ")
}

fn property_parts(properties: &PropertyMap) -> impl Iterator<Item = String> + '_ {
    properties
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
}
