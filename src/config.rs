//! Generator configuration
//!
//! Every default reproduces the checked-in canonical fixture, so a run with
//! no configuration at all is also a regression check.

use crate::error::{FixtureError, Result};
use crate::fixture::RegressionExpectation;
use crate::seed::MutationRules;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEED: u64 = 1;
pub const DEFAULT_LOCUS_COUNT: usize = 2000;
pub const DEFAULT_TARGET_SIZE: usize = 7000;
pub const DEFAULT_PUBLIC_PROPORTION: f64 = 0.8;

/// Parameters of one fixture generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed of the draw stream
    pub seed: u64,
    /// Loci per profile
    pub locus_count: usize,
    /// Profiles to generate
    pub target_size: usize,
    /// Mutation model
    pub mutation: MutationRules,
    /// Allele id at every locus of the root ancestor
    pub ancestor_allele: u32,
    /// Probability that a genome is marked public
    pub public_proportion: f64,
    /// Emit only public genomes
    pub visible_only: bool,
    /// Prefix of generated locus names
    pub locus_prefix: String,
    /// Organism every genome is attributed to
    pub organism_id: String,
    /// cgMLST scheme version stamped on each genome
    pub scheme_version: String,
    /// Digits in a genome identity
    pub id_width: usize,
    /// Expected end state; `None` disables the regression check
    pub regression: Option<RegressionExpectation>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            locus_count: DEFAULT_LOCUS_COUNT,
            target_size: DEFAULT_TARGET_SIZE,
            mutation: MutationRules::default(),
            ancestor_allele: 1,
            public_proportion: DEFAULT_PUBLIC_PROPORTION,
            visible_only: false,
            locus_prefix: "gene".to_string(),
            organism_id: "1280".to_string(),
            scheme_version: "0".to_string(),
            id_width: 6,
            regression: Some(RegressionExpectation::canonical()),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&json)?;
        info!("Loaded generator config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// A small configuration for tests and demos; no regression check.
    pub fn small(seed: u64, locus_count: usize, target_size: usize) -> Self {
        Self {
            seed,
            locus_count,
            target_size,
            regression: None,
            ..Self::default()
        }
    }

    /// Whether the draw-shaping parameters match the canonical fixture.
    pub fn is_canonical(&self) -> bool {
        let canonical = Self::default();
        self.seed == canonical.seed
            && self.locus_count == canonical.locus_count
            && self.target_size == canonical.target_size
            && self.mutation == canonical.mutation
            && self.ancestor_allele == canonical.ancestor_allele
            && self.public_proportion == canonical.public_proportion
    }

    /// Override the main parameters.
    ///
    /// If the result is no longer canonical but still carries the canonical
    /// expectation, the regression check is dropped.
    pub fn apply_overrides(&mut self, seed: Option<u64>, locus_count: Option<usize>, target_size: Option<usize>) {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        if let Some(loci) = locus_count {
            self.locus_count = loci;
        }
        if let Some(size) = target_size {
            self.target_size = size;
        }
        if !self.is_canonical() && self.regression == Some(RegressionExpectation::canonical()) {
            warn!(
                "Parameters differ from the canonical fixture (seed {}, {} loci, {} profiles); regression check disabled",
                self.seed, self.locus_count, self.target_size
            );
            self.regression = None;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.locus_count == 0 {
            return Err(FixtureError::Config("locus_count must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.public_proportion) {
            return Err(FixtureError::Config(format!(
                "public_proportion must be within [0, 1], got {}",
                self.public_proportion
            )));
        }
        let widest = self.target_size.saturating_sub(1).to_string().len();
        if self.id_width < widest {
            return Err(FixtureError::Config(format!(
                "id_width {} cannot hold {} identities",
                self.id_width, self.target_size
            )));
        }
        self.mutation.validate().map_err(FixtureError::Config)?;
        Ok(())
    }
}
