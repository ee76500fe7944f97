//! Fixture generation pipeline
//!
//! draw stream -> mutation model -> population builder -> document
//! assembler -> sink, with the regression guard run between generation and
//! the first write. Generation is single-threaded: every step shares one
//! ordered draw stream.

pub mod catalog;
mod guard;

pub use guard::{
    RegressionExpectation, RegressionGuard, CANONICAL_NEXT_DRAW, CANONICAL_RECORDS,
    CANONICAL_VISIBLE_RECORDS,
};

use crate::config::GeneratorConfig;
use crate::document::{Document, DocumentAssembler, ManifestRecord, Specimen};
use crate::error::Result;
use crate::seed::{DrawSource, Population, PopulationBuilder, SineSequence};
use crate::storage::{DocumentSink, EmitMode, FixtureFile};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitReport {
    /// All documents written, manifest and auxiliary included
    pub documents: usize,
    pub genomes: usize,
    pub auxiliary: usize,
    /// SHA-256 of the written bytes; empty for sinks that do not hash
    pub digest: String,
}

/// A generated population, ready to be emitted
#[derive(Debug, Clone)]
pub struct GeneratedFixture {
    pub population: Population,
    pub specimens: Vec<Specimen>,
    pub auxiliary: Vec<Document>,
    /// Draws consumed by generation
    pub draws: u64,
    assembler: DocumentAssembler,
    visible_only: bool,
}

impl GeneratedFixture {
    /// Specimens that become genome documents, in emission order.
    pub fn emitted(&self) -> impl Iterator<Item = &Specimen> + '_ {
        let visible_only = self.visible_only;
        self.specimens.iter().filter(move |s| s.public || !visible_only)
    }

    pub fn genome_count(&self) -> usize {
        self.emitted().count()
    }

    pub fn visible_count(&self) -> usize {
        self.specimens.iter().filter(|s| s.public).count()
    }

    /// Manifest plus genome documents; auxiliary documents are not counted.
    pub fn record_count(&self) -> usize {
        1 + self.genome_count()
    }

    pub fn manifest(&self) -> ManifestRecord {
        self.assembler.manifest(self.emitted())
    }

    /// Every document in emission order, assembled on demand.
    pub fn documents(&self) -> impl Iterator<Item = Document> + '_ {
        std::iter::once(Document::from(self.manifest()))
            .chain(self.auxiliary.iter().cloned())
            .chain(self.emitted().map(move |s| {
                Document::from(self.assembler.assemble(&self.population.profiles[s.index], s))
            }))
    }

    /// Write every document to `sink`, one call per document, then finish it.
    pub fn emit<K: DocumentSink>(&self, sink: &mut K) -> Result<EmitReport> {
        let mut documents = 0;
        for document in self.documents() {
            debug!("Emitting {} document {}", document.kind(), documents);
            sink.write_document(&document)?;
            documents += 1;
        }
        sink.finish()?;
        Ok(EmitReport {
            documents,
            genomes: self.genome_count(),
            auxiliary: self.auxiliary.len(),
            digest: String::new(),
        })
    }

    /// Write the explicit ancestry of the population as JSON.
    pub fn write_lineage(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.population.lineage)?;
        std::fs::write(path.as_ref(), json)?;
        info!("Wrote lineage of {} profiles to {}", self.population.len(), path.as_ref().display());
        Ok(())
    }
}

/// Runs the generation pipeline for one configuration
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    config: GeneratorConfig,
}

impl FixtureGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Grow the population, draw visibility, and run the regression check.
    ///
    /// `auxiliary` documents are placed after the manifest and before the
    /// genomes, in the order given.
    pub fn generate(&self, auxiliary: Vec<Document>) -> Result<GeneratedFixture> {
        let config = &self.config;
        let mut seq = SineSequence::new(config.seed);
        let assembler = DocumentAssembler::from_config(config);
        let builder = PopulationBuilder::new(config.mutation.clone(), config.ancestor_allele);

        info!(
            "Generating {} profiles x {} loci from seed {}",
            config.target_size, config.locus_count, config.seed
        );
        let population = builder.build(config.target_size, config.locus_count, &mut seq);
        // Visibility is drawn only once the whole population exists.
        let specimens: Vec<Specimen> = (0..population.len())
            .map(|index| Specimen {
                index,
                public: assembler.draw_visibility(&mut seq),
            })
            .collect();
        let draws = seq.draws();

        let fixture = GeneratedFixture {
            population,
            specimens,
            auxiliary,
            draws,
            assembler,
            visible_only: config.visible_only,
        };
        info!(
            "Generated {} profiles ({} public) using {} draws",
            fixture.specimens.len(),
            fixture.visible_count(),
            draws
        );

        match config.regression {
            Some(expectation) => {
                RegressionGuard::new(expectation).check(&mut seq, fixture.record_count(), config.visible_only)?
            }
            None => warn!("No regression expectation configured; fixture is unchecked"),
        }
        Ok(fixture)
    }

    /// Generate and write a fixture file. Nothing is left on disk on failure.
    pub fn write(&self, auxiliary: Vec<Document>, path: impl AsRef<Path>, mode: EmitMode) -> Result<(GeneratedFixture, EmitReport)> {
        self.write_with_lineage(auxiliary, path, mode, None)
    }

    /// Like [`write`](Self::write), also writing the lineage sidecar to
    /// `lineage`. The sidecar is written before the fixture is committed, so
    /// a failed sidecar leaves the fixture untouched.
    pub fn write_with_lineage(
        &self,
        auxiliary: Vec<Document>,
        path: impl AsRef<Path>,
        mode: EmitMode,
        lineage: Option<&Path>,
    ) -> Result<(GeneratedFixture, EmitReport)> {
        let fixture = self.generate(auxiliary)?;
        let mut file = FixtureFile::open(path, mode)?;
        let mut report = fixture.emit(&mut file)?;
        if let Some(lineage) = lineage {
            fixture.write_lineage(lineage)?;
        }
        report.digest = file.commit()?;
        Ok((fixture, report))
    }
}
