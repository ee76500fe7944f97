//! cgMLST fixtures — deterministic synthetic genomes for clustering tests
//!
//! Grows a clonal population of allele profiles from one seeded draw stream
//! and writes it as the document stream a genomic clustering service reads,
//! checking that the run reproduced the checked-in fixture before writing.

pub mod config;
pub mod document;
pub mod error;
pub mod fixture;
pub mod seed;
pub mod storage;

pub use config::GeneratorConfig;
pub use document::{Document, DocumentAssembler, GenomeRecord, ManifestRecord, Specimen};
pub use error::{FixtureError, Result};
pub use fixture::{EmitReport, FixtureGenerator, GeneratedFixture, RegressionExpectation, RegressionGuard};
pub use seed::{AlleleValue, DrawSource, MutationRules, Population, PopulationBuilder, Profile, SineSequence};
pub use storage::{DocumentSink, EmitMode, FixtureFile, JsonLinesSink, MemorySink};
