//! Single-line JSON rendering of records and errors

use crate::error::CliError;
use parquet_records::Record;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Stream `records` as one JSON array followed by a newline
///
/// Records are serialized as they are produced, so the full array is never
/// held in memory at once.
pub fn write_records<W, I>(mut writer: W, records: I) -> Result<usize, CliError>
where
    W: Write,
    I: IntoIterator<Item = Record>,
{
    let mut count = 0usize;
    writer.write_all(b"[")?;
    for record in records {
        if count > 0 {
            writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut writer, &record)?;
        count += 1;
    }
    writer.write_all(b"]\n")?;
    writer.flush()?;
    Ok(count)
}

/// Write `{"error": "<message>"}` followed by a newline
pub fn write_error<W: Write>(mut writer: W, message: &str) -> Result<(), CliError> {
    serde_json::to_writer(&mut writer, &ErrorPayload { error: message })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
