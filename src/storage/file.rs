//! JSON-lines fixture files with all-or-nothing writes

use super::DocumentSink;
use crate::document::Document;
use crate::error::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How a fixture file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitMode {
    /// Replace any existing file
    Create,
    /// Extend an existing file, leaving earlier documents untouched
    Append,
}

/// Writes one JSON document per line and hashes exactly what it writes
pub struct JsonLinesSink<W: Write> {
    writer: W,
    hasher: Sha256,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    /// Documents written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// SHA-256 of every byte written so far, hex encoded.
    pub fn digest(&self) -> String {
        hex::encode(self.hasher.clone().finalize())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for JsonLinesSink<W> {
    fn write_document(&mut self, document: &Document) -> Result<()> {
        let mut line = serde_json::to_vec(document)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.hasher.update(&line);
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// A fixture file on disk that only becomes visible once committed
///
/// `Create` writes to a `.partial` sibling and renames it on commit.
/// `Append` writes in place and truncates back to the original length if
/// the write is abandoned, or removes the file if the append created it.
pub struct FixtureFile {
    path: PathBuf,
    staging: Option<PathBuf>,
    original_len: u64,
    /// Whether `path` was already on disk when opened
    existed: bool,
    sink: Option<JsonLinesSink<BufWriter<File>>>,
}

impl FixtureFile {
    pub fn open(path: impl AsRef<Path>, mode: EmitMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let existed = path.exists();
        let (file, staging, original_len) = match mode {
            EmitMode::Create => {
                let staging = staging_path(&path);
                (File::create(&staging)?, Some(staging), 0)
            }
            EmitMode::Append => {
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                let len = file.metadata()?.len();
                (file, None, len)
            }
        };
        Ok(Self {
            path,
            staging,
            original_len,
            existed,
            sink: Some(JsonLinesSink::new(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish writing and make the file visible. Returns the content digest.
    pub fn commit(mut self) -> Result<String> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(String::new());
        };
        sink.finish()?;
        let digest = sink.digest();
        let written = sink.written();
        let file = sink.into_inner().into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        if let Some(staging) = self.staging.take() {
            std::fs::rename(&staging, &self.path)?;
        }
        info!("Wrote {} documents to {} (sha256 {})", written, self.path.display(), digest);
        Ok(digest)
    }

    /// Throw away everything written through this handle.
    pub fn abort(mut self) -> Result<()> {
        self.discard()
    }

    fn discard(&mut self) -> Result<()> {
        let Some(sink) = self.sink.take() else {
            return Ok(());
        };
        drop(sink);
        match self.staging.take() {
            Some(staging) => {
                if staging.exists() {
                    std::fs::remove_file(&staging)?;
                }
            }
            None if !self.existed => {
                if self.path.exists() {
                    std::fs::remove_file(&self.path)?;
                }
            }
            None => {
                let file = OpenOptions::new().write(true).open(&self.path)?;
                file.set_len(self.original_len)?;
            }
        }
        warn!("Discarded partial fixture {}", self.path.display());
        Ok(())
    }
}

impl DocumentSink for FixtureFile {
    fn write_document(&mut self, document: &Document) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.write_document(document),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.finish(),
            None => Ok(()),
        }
    }
}

impl Drop for FixtureFile {
    fn drop(&mut self) {
        if self.sink.is_some() {
            if let Err(e) = self.discard() {
                warn!("Failed to discard partial fixture {}: {}", self.path.display(), e);
            }
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ManifestRecord;

    fn manifest(ids: &[&str]) -> Document {
        Document::from(ManifestRecord::new(ids.iter().copied()))
    }

    #[test]
    fn test_json_lines_output() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_document(&manifest(&["a"])).unwrap();
        sink.write_document(&manifest(&["b", "c"])).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);
        let digest = sink.digest();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "{\"genomes\":[{\"fileId\":\"a\"}]}\n{\"genomes\":[{\"fileId\":\"b\"},{\"fileId\":\"c\"}]}\n"
        );
        assert_eq!(digest, hex::encode(Sha256::digest(text.as_bytes())));
    }

    #[test]
    fn test_create_is_invisible_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("fixture.jsonl");
        let mut file = FixtureFile::open(&path, EmitMode::Create).unwrap();
        file.write_document(&manifest(&["a"])).unwrap();
        assert!(!path.exists());
        file.commit().unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("out").join("fixture.jsonl.partial").exists());
    }

    #[test]
    fn test_abort_create_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.jsonl");
        let mut file = FixtureFile::open(&path, EmitMode::Create).unwrap();
        file.write_document(&manifest(&["a"])).unwrap();
        file.abort().unwrap();
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_append_extends_and_abort_restores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.jsonl");

        let mut file = FixtureFile::open(&path, EmitMode::Create).unwrap();
        file.write_document(&manifest(&["a"])).unwrap();
        file.commit().unwrap();
        let original = std::fs::read_to_string(&path).unwrap();

        let mut file = FixtureFile::open(&path, EmitMode::Append).unwrap();
        file.write_document(&manifest(&["b"])).unwrap();
        file.commit().unwrap();
        let appended = std::fs::read_to_string(&path).unwrap();
        assert!(appended.starts_with(&original));
        assert_eq!(appended.lines().count(), 2);

        let mut file = FixtureFile::open(&path, EmitMode::Append).unwrap();
        file.write_document(&manifest(&["c"])).unwrap();
        drop(file);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), appended);
    }

    #[test]
    fn test_abort_append_to_missing_file_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.jsonl");
        let mut file = FixtureFile::open(&path, EmitMode::Append).unwrap();
        file.write_document(&manifest(&["a"])).unwrap();
        file.abort().unwrap();
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_abort_append_to_empty_file_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.jsonl");
        std::fs::write(&path, b"").unwrap();
        let mut file = FixtureFile::open(&path, EmitMode::Append).unwrap();
        file.write_document(&manifest(&["a"])).unwrap();
        file.abort().unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
