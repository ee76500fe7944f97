//! Hand-written fixtures for the clustering service's parser tests
//!
//! Small literal document streams covering manifest parsing, score updates
//! and profile updates, including deliberately malformed documents.

use crate::document::{
    AlleleId, Analysis, CgmlstAnalysis, Document, GenomeRecord, LocusMatch, ManifestRecord,
    ScoreRecord,
};
use serde_json::json;

const NAMES: [&str; 4] = ["parse-genome-doc", "update-scores", "update-profiles", "parse"];

/// Names of every literal fixture.
pub fn names() -> &'static [&'static str] {
    &NAMES
}

/// Build the named fixture.
pub fn build(name: &str) -> Option<Vec<Document>> {
    let documents = match name {
        "parse-genome-doc" => parse_genome_doc(),
        "update-scores" => vec![scores("abc", &[("bcd", 1), ("cde", 2)])],
        "update-profiles" => vec![genome(1, "abc", &[("foo", int(1)), ("bar", token("xyz"))])],
        "parse" => parse(),
        _ => return None,
    };
    Some(documents)
}

/// Manifest variants: valid, with duplicates, and two malformed ones.
fn parse_genome_doc() -> Vec<Document> {
    vec![
        ManifestRecord::new(["abc", "def", "ghi"]).into(),
        ManifestRecord::new(["abc", "abc", "ghi"]).into(),
        external(json!({"genomes": [{"wrong": "abc"}]})),
        external(json!({"wrong": [{"fileId": "abc"}]})),
    ]
}

/// Manifest, cached scores for two genomes, then profiles for the other two.
fn parse() -> Vec<Document> {
    vec![
        ManifestRecord::new(["abc", "def", "ghi", "jkl"]).into(),
        scores("abc", &[("def", 1), ("ghi", 2), ("jkl", 3)]),
        scores("def", &[("ghi", 4), ("jkl", 5)]),
        genome(1, "ghi", &[("foo", int(1)), ("bar", token("xyz"))]),
        genome(2, "jkl", &[("foo", int(1)), ("bar", int(2))]),
    ]
}

fn int(n: u32) -> AlleleId {
    AlleleId::Int(n)
}

fn token(t: &str) -> AlleleId {
    AlleleId::Token(t.to_string())
}

fn scores(file_id: &str, pairs: &[(&str, i32)]) -> Document {
    ScoreRecord {
        file_id: file_id.to_string(),
        scores: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
    .into()
}

fn genome(object: usize, file_id: &str, matches: &[(&str, AlleleId)]) -> Document {
    GenomeRecord {
        object_id: format!("{:024x}", object),
        file_id: file_id.to_string(),
        organism_id: "1280".to_string(),
        public: true,
        analysis: Analysis {
            cgmlst: CgmlstAnalysis {
                version: "0".to_string(),
                matches: matches
                    .iter()
                    .map(|(gene, id)| LocusMatch {
                        gene: gene.to_string(),
                        id: id.clone(),
                    })
                    .collect(),
            },
        },
    }
    .into()
}

fn external(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => Document::External(map),
        other => Document::External(serde_json::Map::from_iter([("value".to_string(), other)])),
    }
}
