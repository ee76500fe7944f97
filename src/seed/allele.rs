//! Allele values and allele profiles
//!
//! A profile is one synthetic genome: a fixed-length vector with one allele
//! observation per locus of the typing scheme.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters in a rendered novel-allele token.
pub const NOVEL_TOKEN_LEN: usize = 40;

/// Opaque identity of a novel allele.
///
/// Stores the bit pattern of the draw that created it; the rendered token is
/// a hash of those bits, so distinct draws give distinct tokens in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NovelToken(pub u64);

impl NovelToken {
    pub fn from_draw(draw: f64) -> Self {
        Self(draw.to_bits())
    }

    pub fn render(&self) -> String {
        let digest = Sha256::digest(self.0.to_le_bytes());
        let mut token = hex::encode(digest);
        token.truncate(NOVEL_TOKEN_LEN);
        token
    }
}

impl fmt::Display for NovelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Observation at one locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleValue {
    /// A known allele id; low ids are the common variants.
    Known(u32),
    /// An allele never seen before.
    Novel(NovelToken),
    /// The locus was not observed.
    Missing,
}

impl AlleleValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, AlleleValue::Missing)
    }
}

/// One synthetic genome's allele profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    alleles: Vec<AlleleValue>,
}

impl Profile {
    /// The root of every lineage: the same known allele at every locus.
    pub fn uniform(allele: u32, loci: usize) -> Self {
        Self {
            alleles: vec![AlleleValue::Known(allele); loci],
        }
    }

    pub fn from_alleles(alleles: Vec<AlleleValue>) -> Self {
        Self { alleles }
    }

    pub fn alleles(&self) -> &[AlleleValue] {
        &self.alleles
    }

    pub fn get(&self, locus: usize) -> Option<&AlleleValue> {
        self.alleles.get(locus)
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Loci that carry an observation.
    pub fn present(&self) -> usize {
        self.alleles.iter().filter(|a| !a.is_missing()).count()
    }

    /// Allelic distance: loci where both profiles are observed and differ.
    ///
    /// Missing loci are ignored on either side, the way cgMLST distances are
    /// scored by the clustering service.
    pub fn distance(&self, other: &Profile) -> usize {
        self.alleles
            .iter()
            .zip(other.alleles.iter())
            .filter(|(a, b)| !a.is_missing() && !b.is_missing() && a != b)
            .count()
    }
}
