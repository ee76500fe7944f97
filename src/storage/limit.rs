//! Cut a fixture down to its first few documents

use crate::error::Result;
use std::io::{BufRead, Write};

/// Copy the first `limit` documents from a JSON-lines fixture.
///
/// Each copied line is parsed first, so a truncated or corrupt source fails
/// instead of producing a broken fixture. Returns the number copied.
pub fn limit_documents<R: BufRead, W: Write>(reader: R, mut writer: W, limit: usize) -> Result<usize> {
    let mut copied = 0;
    for line in reader.lines() {
        if copied == limit {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        serde_json::from_str::<serde_json::Value>(&line)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        copied += 1;
    }
    writer.flush()?;
    Ok(copied)
}
