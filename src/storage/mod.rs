//! Fixture storage — where documents go, and where auxiliary ones come from
//!
//! The clustering service reads a binary document stream; here the stream is
//! written one JSON document per line behind the [`DocumentSink`] seam, so a
//! binary codec can be swapped in without touching generation.

mod file;
mod limit;
mod scores;

pub use file::{EmitMode, FixtureFile, JsonLinesSink};
pub use limit::limit_documents;
pub use scores::{read_auxiliary, read_auxiliary_path, write_auxiliary};

use crate::document::Document;
use crate::error::Result;

/// Receives fixture documents in emission order
pub trait DocumentSink {
    fn write_document(&mut self, document: &Document) -> Result<()>;

    /// Flush anything buffered. Called once after the last document.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: DocumentSink + ?Sized> DocumentSink for &mut T {
    fn write_document(&mut self, document: &Document) -> Result<()> {
        (**self).write_document(document)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Keeps documents in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Vec<Document>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for MemorySink {
    fn write_document(&mut self, document: &Document) -> Result<()> {
        self.documents.push(document.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
