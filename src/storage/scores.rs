//! Auxiliary input — externally computed documents, gzip-compressed JSON lines
//!
//! Typically cached pairwise scores from an earlier clustering run. Every
//! line becomes one document spliced into the fixture ahead of the generated
//! genomes, so a bad line is fatal rather than skipped.

use crate::document::Document;
use crate::error::{FixtureError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Decompress and parse auxiliary documents. Blank lines are ignored.
pub fn read_auxiliary<R: Read>(reader: R) -> Result<Vec<Document>> {
    let lines = BufReader::new(GzDecoder::new(reader)).lines();
    let mut documents = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| FixtureError::Auxiliary {
            line: line_no,
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value =
            serde_json::from_str(&line).map_err(|e| FixtureError::Auxiliary {
                line: line_no,
                reason: e.to_string(),
            })?;
        if !value.is_object() {
            return Err(FixtureError::Auxiliary {
                line: line_no,
                reason: "expected a JSON object".to_string(),
            });
        }
        let document: Document = serde_json::from_value(value).map_err(|e| FixtureError::Auxiliary {
            line: line_no,
            reason: e.to_string(),
        })?;
        documents.push(document);
    }
    Ok(documents)
}

pub fn read_auxiliary_path(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let documents = read_auxiliary(File::open(path)?)?;
    info!("Read {} auxiliary documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Write documents in the auxiliary format.
pub fn write_auxiliary<W: Write>(writer: W, documents: &[Document]) -> Result<W> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    for document in documents {
        serde_json::to_writer(&mut encoder, document)?;
        encoder.write_all(b"\n")?;
    }
    Ok(encoder.finish()?)
}
