//! PopulationBuilder — clonal expansion of one ancestor into a population
//!
//! Growth doubles every round: each held profile yields one mutated
//! descendant, appended in rank order, until the target size is reached.
//! Distances between profiles therefore follow a binary phylogeny rather
//! than uniform noise.

use super::allele::Profile;
use super::lineage::Lineage;
use super::mutation::{MutationRules, MutationTally};
use super::sequence::DrawSource;
use log::{debug, info};

/// A generated population in emission order
#[derive(Debug, Clone)]
pub struct Population {
    pub profiles: Vec<Profile>,
    pub lineage: Lineage,
    pub tally: MutationTally,
}

impl Population {
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Grows populations under a fixed set of mutation rules
#[derive(Debug, Clone)]
pub struct PopulationBuilder {
    rules: MutationRules,
    ancestor_allele: u32,
}

impl PopulationBuilder {
    pub fn new(rules: MutationRules, ancestor_allele: u32) -> Self {
        Self {
            rules,
            ancestor_allele,
        }
    }

    pub fn rules(&self) -> &MutationRules {
        &self.rules
    }

    /// Grow a population of exactly `target` profiles over `loci` loci.
    pub fn build<S: DrawSource>(&self, target: usize, loci: usize, src: &mut S) -> Population {
        self.build_with(target, loci, src, |_, _, _| {})
    }

    /// Like [`build`](Self::build), calling `on_profile` right after each
    /// profile is created and before the next one draws anything.
    pub fn build_with<S, F>(&self, target: usize, loci: usize, src: &mut S, mut on_profile: F) -> Population
    where
        S: DrawSource,
        F: FnMut(&mut S, usize, &Profile),
    {
        let mut profiles: Vec<Profile> = Vec::with_capacity(target);
        let mut lineage = Lineage::with_capacity(target);
        let mut tally = MutationTally::default();

        if target == 0 {
            return Population { profiles, lineage, tally };
        }

        let ancestor = Profile::uniform(self.ancestor_allele, loci);
        let first = self.rules.mutate_profile(&ancestor, src, &mut tally);
        on_profile(src, 0, &first);
        profiles.push(first);
        lineage.push(None, 0);

        let mut round = 1;
        while profiles.len() < target {
            let held = profiles.len();
            for parent in 0..held {
                if profiles.len() == target {
                    break;
                }
                let child = self.rules.mutate_profile(&profiles[parent], src, &mut tally);
                let index = lineage.push(Some(parent), round);
                on_profile(src, index, &child);
                profiles.push(child);
            }
            debug!("Round {} complete: {} profiles", round, profiles.len());
            round += 1;
        }

        info!(
            "Grew {} profiles x {} loci over {} rounds ({} hot, {} retyped, {} novel, {} missing)",
            profiles.len(),
            loci,
            lineage.rounds(),
            tally.hot_profiles,
            tally.retyped,
            tally.novel,
            tally.missing
        );

        Population { profiles, lineage, tally }
    }
}
