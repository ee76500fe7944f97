//! Document shapes read by the clustering service
//!
//! A fixture is a stream of these documents: a manifest naming every genome,
//! optional cached score documents, then one genome document per profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to one genome in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRef {
    #[serde(rename = "fileId")]
    pub file_id: String,
}

/// First document of a fixture: the genomes the service should cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub genomes: Vec<GenomeRef>,
}

impl ManifestRecord {
    pub fn new<I, S>(file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genomes: file_ids
                .into_iter()
                .map(|id| GenomeRef { file_id: id.into() })
                .collect(),
        }
    }

    pub fn file_ids(&self) -> impl Iterator<Item = &str> {
        self.genomes.iter().map(|g| g.file_id.as_str())
    }
}

/// Previously computed distances from one genome to others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "fileId")]
    pub file_id: String,
    pub scores: BTreeMap<String, i32>,
}

/// Allele id as it appears in a match: an integer or a novel-allele token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlleleId {
    Int(u32),
    Token(String),
}

/// One observed locus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusMatch {
    pub gene: String,
    pub id: AlleleId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgmlstAnalysis {
    #[serde(rename = "__v")]
    pub version: String,
    pub matches: Vec<LocusMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub cgmlst: CgmlstAnalysis,
}

/// One genome and its cgMLST allele calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRecord {
    #[serde(rename = "_id")]
    pub object_id: String,
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(rename = "organismId")]
    pub organism_id: String,
    pub public: bool,
    pub analysis: Analysis,
}

impl GenomeRecord {
    pub fn matches(&self) -> &[LocusMatch] {
        &self.analysis.cgmlst.matches
    }
}

/// Any document a fixture can contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Manifest(ManifestRecord),
    Genome(GenomeRecord),
    Scores(ScoreRecord),
    /// Passed through from auxiliary input unchanged
    External(serde_json::Map<String, serde_json::Value>),
}

impl Document {
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Manifest(_) => "manifest",
            Document::Genome(_) => "genome",
            Document::Scores(_) => "scores",
            Document::External(_) => "external",
        }
    }
}

impl From<ManifestRecord> for Document {
    fn from(record: ManifestRecord) -> Self {
        Document::Manifest(record)
    }
}

impl From<GenomeRecord> for Document {
    fn from(record: GenomeRecord) -> Self {
        Document::Genome(record)
    }
}

impl From<ScoreRecord> for Document {
    fn from(record: ScoreRecord) -> Self {
        Document::Scores(record)
    }
}
