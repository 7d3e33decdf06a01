//! JSON line I/O for the CLI
//!
//! - Input: one JSON document per line, blank lines skipped
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::field::FieldError;

/// Non-empty input lines, numbered from 1.
pub fn read_lines<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<(usize, String)>> {
    input
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((i + 1, line))),
            Err(e) => Some(Err(e.into())),
        })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, line: usize, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "line": line,
        "data": data
    });
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

/// Write a field error response, with field-level details when present
pub fn write_field_error<W: Write>(out: &mut W, line: usize, err: &FieldError) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "line": line,
        "code": err.code().code(),
        "message": err.to_string(),
        "errors": err.details()
    });
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    Ok(())
}

/// Write raw text followed by a newline
pub fn write_text<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    writeln!(out, "{}", text)?;
    Ok(())
}
