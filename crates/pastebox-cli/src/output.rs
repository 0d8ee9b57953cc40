use serde::Serialize;
use std::io::Write;

/// Pretty-print `value` as one JSON document followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value)?;
    lock.flush()?;
    Ok(())
}
