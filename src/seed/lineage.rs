//! Lineage — explicit ancestry of a generated population
//!
//! The builder grows the population by doubling, so a profile's parent is
//! implied by its position. Lineage records it explicitly instead, which
//! keeps ancestry queries independent of the growth scheme.

use serde::{Deserialize, Serialize};

/// Parent index and growth round for every profile in a population
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// Parent of each profile; `None` when descended directly from the root ancestor
    parents: Vec<Option<usize>>,
    /// Growth round in which each profile was created
    rounds: Vec<u32>,
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            parents: Vec::with_capacity(n),
            rounds: Vec::with_capacity(n),
        }
    }

    /// Record the next profile; returns its index.
    pub fn push(&mut self, parent: Option<usize>, round: u32) -> usize {
        self.parents.push(parent);
        self.rounds.push(round);
        self.parents.len() - 1
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn round_of(&self, index: usize) -> Option<u32> {
        self.rounds.get(index).copied()
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Number of completed rounds.
    pub fn rounds(&self) -> u32 {
        self.rounds.last().map_or(0, |r| r + 1)
    }

    /// Chain from `index` back to the root-derived profile, `index` first.
    pub fn ancestry(&self, index: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        if index >= self.len() {
            return chain;
        }
        let mut current = Some(index);
        while let Some(i) = current {
            chain.push(i);
            current = self.parent_of(i);
        }
        chain
    }

    /// Number of mutation steps between `index` and the root ancestor.
    pub fn depth(&self, index: usize) -> usize {
        self.ancestry(index).len()
    }

    /// Direct children of `index`, in creation order.
    pub fn children_of(&self, index: usize) -> Vec<usize> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == Some(index))
            .map(|(i, _)| i)
            .collect()
    }
}
