//! Genome documents — the records a fixture is made of

mod assembler;
mod record;

pub use assembler::{DocumentAssembler, Specimen};
pub use record::{
    AlleleId, Analysis, CgmlstAnalysis, Document, GenomeRecord, GenomeRef, LocusMatch,
    ManifestRecord, ScoreRecord,
};
