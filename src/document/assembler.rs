//! DocumentAssembler — turns generated profiles into genome documents

use super::record::{AlleleId, Analysis, CgmlstAnalysis, GenomeRecord, LocusMatch, ManifestRecord};
use crate::config::GeneratorConfig;
use crate::seed::{AlleleValue, DrawSource, Profile};
use serde::{Deserialize, Serialize};

/// Generation-time facts about one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specimen {
    /// Position in emission order
    pub index: usize,
    pub public: bool,
}

#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    locus_names: Vec<String>,
    organism_id: String,
    scheme_version: String,
    id_width: usize,
    public_proportion: f64,
}

impl DocumentAssembler {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            locus_names: (0..config.locus_count)
                .map(|i| format!("{}{:04}", config.locus_prefix, i))
                .collect(),
            organism_id: config.organism_id.clone(),
            scheme_version: config.scheme_version.clone(),
            id_width: config.id_width,
            public_proportion: config.public_proportion,
        }
    }

    pub fn locus_names(&self) -> &[String] {
        &self.locus_names
    }

    /// Zero-padded genome identity for `index`.
    pub fn identity(&self, index: usize) -> String {
        format!("{:0width$}", index, width = self.id_width)
    }

    /// 24-hex-digit object id for `index`.
    pub fn object_id(&self, index: usize) -> String {
        format!("{:024x}", index)
    }

    /// Draw the public flag for the profile just generated.
    pub fn draw_visibility<S: DrawSource>(&self, src: &mut S) -> bool {
        src.next_draw() < self.public_proportion
    }

    pub fn assemble(&self, profile: &Profile, specimen: &Specimen) -> GenomeRecord {
        let matches = profile
            .alleles()
            .iter()
            .zip(self.locus_names.iter())
            .filter_map(|(allele, gene)| {
                let id = match allele {
                    AlleleValue::Known(n) => AlleleId::Int(*n),
                    AlleleValue::Novel(token) => AlleleId::Token(token.render()),
                    AlleleValue::Missing => return None,
                };
                Some(LocusMatch { gene: gene.clone(), id })
            })
            .collect();

        GenomeRecord {
            object_id: self.object_id(specimen.index),
            file_id: self.identity(specimen.index),
            organism_id: self.organism_id.clone(),
            public: specimen.public,
            analysis: Analysis {
                cgmlst: CgmlstAnalysis {
                    version: self.scheme_version.clone(),
                    matches,
                },
            },
        }
    }

    pub fn manifest<'a>(&self, specimens: impl IntoIterator<Item = &'a Specimen>) -> ManifestRecord {
        ManifestRecord::new(specimens.into_iter().map(|s| self.identity(s.index)))
    }
}
