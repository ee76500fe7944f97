//! Synthetic genome generation — the deterministic core
//!
//! A seeded draw stream drives a per-locus mutation model, which a builder
//! applies generation after generation to grow a clonal population of
//! allele profiles.

mod allele;
mod lineage;
mod mutation;
mod population;
mod sequence;

pub use allele::{AlleleValue, NovelToken, Profile, NOVEL_TOKEN_LEN};
pub use lineage::Lineage;
pub use mutation::{MutationOutcome, MutationRegime, MutationRules, MutationTally};
pub use population::{Population, PopulationBuilder};
pub use sequence::{CountingSource, DrawSource, ScriptedSource, SineSequence};
