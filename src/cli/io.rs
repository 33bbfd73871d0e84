//! JSON output for CLI commands: one object per line on stdout

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write `value` as a single JSON line to `out`
pub fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write `value` as a single JSON line to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}

/// Write a plain text line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
