//! MutationRules — how a descendant's alleles drift from its ancestor
//!
//! Every descendant profile first picks a mutation regime with one draw, then
//! takes one draw per locus. That draw falls into one of four bands, checked
//! in a fixed order:
//!
//! ```text
//! [0, rate)                          -> re-typed known allele
//! [rate, rate + novel)               -> novel allele
//! [rate + novel, rate + novel + miss) -> missing
//! [rate + novel + miss, 1)           -> unchanged
//! ```
//!
//! Re-typed and novel loci take one more draw for the new allele.
//!
//! Bands are not renormalised. With extreme rates the bands can extend past
//! 1, in which case the later ones simply shrink or vanish.

use super::allele::{AlleleValue, NovelToken, Profile};
use super::sequence::DrawSource;
use log::warn;
use serde::{Deserialize, Serialize};

/// Rates and shape of the mutation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationRules {
    /// Per-locus re-typing rate for a hypermutating descendant
    pub hot_rate: f64,
    /// Per-locus re-typing rate for an ordinary descendant
    pub cold_rate: f64,
    /// Probability that a descendant hypermutates
    pub hot_probability: f64,
    /// Novel-allele rate as a fraction of the re-typing rate
    pub novel_fraction: f64,
    /// Missing-locus rate as a fraction of the re-typing rate
    pub missing_fraction: f64,
    /// Largest known allele id a re-typing can produce
    pub max_allele: u32,
    /// Exponent below 1 that skews re-typed ids toward small values
    pub skew_exponent: f64,
}

impl Default for MutationRules {
    fn default() -> Self {
        Self {
            hot_rate: 0.2,
            cold_rate: 0.02,
            hot_probability: 0.1,
            novel_fraction: 0.02,
            missing_fraction: 0.02,
            max_allele: 100,
            skew_exponent: 0.2,
        }
    }
}

/// The band an individual locus draw fell into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationOutcome {
    Unchanged,
    Retyped,
    Novel,
    Missing,
}

/// Per-profile rates, fixed by the profile's regime draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRegime {
    pub hot: bool,
    pub rate: f64,
    pub novel_rate: f64,
    pub missing_rate: f64,
}

impl MutationRegime {
    /// Map one locus draw to its band.
    pub fn classify(&self, r: f64) -> MutationOutcome {
        if r < self.rate {
            MutationOutcome::Retyped
        } else if r < self.rate + self.novel_rate {
            MutationOutcome::Novel
        } else if r < self.rate + self.novel_rate + self.missing_rate {
            MutationOutcome::Missing
        } else {
            MutationOutcome::Unchanged
        }
    }

    /// Sum of the three mutating bands.
    pub fn band_total(&self) -> f64 {
        self.rate + self.novel_rate + self.missing_rate
    }
}

/// Outcome counts over one or more mutated profiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationTally {
    pub profiles: u64,
    pub hot_profiles: u64,
    pub unchanged: u64,
    pub retyped: u64,
    pub novel: u64,
    pub missing: u64,
}

impl MutationTally {
    pub fn record(&mut self, outcome: MutationOutcome) {
        match outcome {
            MutationOutcome::Unchanged => self.unchanged += 1,
            MutationOutcome::Retyped => self.retyped += 1,
            MutationOutcome::Novel => self.novel += 1,
            MutationOutcome::Missing => self.missing += 1,
        }
    }

    /// Draws consumed by the mutation steps counted here.
    pub fn draws(&self) -> u64 {
        self.profiles + self.unchanged + self.missing + 2 * (self.retyped + self.novel)
    }
}

impl MutationRules {
    /// Rules for a population that never mutates; useful as a baseline.
    pub fn frozen() -> Self {
        Self {
            hot_rate: 0.0,
            cold_rate: 0.0,
            hot_probability: 0.0,
            ..Self::default()
        }
    }

    /// Check rates are usable; warns when bands can run past 1.
    pub fn validate(&self) -> Result<(), String> {
        let rates = [
            ("hot_rate", self.hot_rate),
            ("cold_rate", self.cold_rate),
            ("hot_probability", self.hot_probability),
            ("novel_fraction", self.novel_fraction),
            ("missing_fraction", self.missing_fraction),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if !(self.skew_exponent.is_finite() && self.skew_exponent > 0.0) {
            return Err(format!("skew_exponent must be positive, got {}", self.skew_exponent));
        }
        for hot in [true, false] {
            let regime = self.regime(hot);
            if regime.band_total() > 1.0 {
                warn!(
                    "Mutation bands for {} regime sum to {:.3}; later bands are truncated",
                    if hot { "hot" } else { "cold" },
                    regime.band_total()
                );
            }
        }
        Ok(())
    }

    /// Rates for the hot or cold regime.
    pub fn regime(&self, hot: bool) -> MutationRegime {
        let rate = if hot { self.hot_rate } else { self.cold_rate };
        MutationRegime {
            hot,
            rate,
            novel_rate: rate * self.novel_fraction,
            missing_rate: rate * self.missing_fraction,
        }
    }

    /// Pick the regime for one descendant (one draw).
    pub fn draw_regime<S: DrawSource>(&self, src: &mut S) -> MutationRegime {
        self.regime(src.next_draw() < self.hot_probability)
    }

    /// Re-typed allele id for a second draw `s`.
    pub fn skewed_allele(&self, s: f64) -> u32 {
        let max = self.max_allele as f64;
        (max * (1.0 - s.powf(self.skew_exponent))).round().clamp(0.0, max) as u32
    }

    /// Descendant value at one locus. Consumes one draw, two when re-typed or novel.
    pub fn mutate<S: DrawSource>(
        &self,
        ancestor: AlleleValue,
        regime: &MutationRegime,
        src: &mut S,
    ) -> (AlleleValue, MutationOutcome) {
        let r = src.next_draw();
        let outcome = regime.classify(r);
        let value = match outcome {
            MutationOutcome::Retyped => AlleleValue::Known(self.skewed_allele(src.next_draw())),
            MutationOutcome::Novel => AlleleValue::Novel(NovelToken::from_draw(src.next_draw())),
            MutationOutcome::Missing => AlleleValue::Missing,
            MutationOutcome::Unchanged => ancestor,
        };
        (value, outcome)
    }

    /// Produce one descendant of `ancestor`.
    pub fn mutate_profile<S: DrawSource>(
        &self,
        ancestor: &Profile,
        src: &mut S,
        tally: &mut MutationTally,
    ) -> Profile {
        let regime = self.draw_regime(src);
        tally.profiles += 1;
        if regime.hot {
            tally.hot_profiles += 1;
        }
        let alleles = ancestor
            .alleles()
            .iter()
            .map(|&allele| {
                let (value, outcome) = self.mutate(allele, &regime, src);
                tally.record(outcome);
                value
            })
            .collect();
        Profile::from_alleles(alleles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sequence::{CountingSource, ScriptedSource, SineSequence};
    use proptest::prelude::*;

    #[test]
    fn test_band_order() {
        let regime = MutationRules::default().regime(false);
        // cold: rate 0.02, novel 0.0004, missing 0.0004
        assert_eq!(regime.classify(0.0), MutationOutcome::Retyped);
        assert_eq!(regime.classify(0.0199), MutationOutcome::Retyped);
        assert_eq!(regime.classify(0.0201), MutationOutcome::Novel);
        assert_eq!(regime.classify(0.0205), MutationOutcome::Missing);
        assert_eq!(regime.classify(0.0209), MutationOutcome::Unchanged);
        assert_eq!(regime.classify(0.9), MutationOutcome::Unchanged);
    }

    #[test]
    fn test_regime_selection() {
        let rules = MutationRules::default();
        let mut src = ScriptedSource::new([0.05, 0.5], 0.5);
        assert!(rules.draw_regime(&mut src).hot);
        let cold = rules.draw_regime(&mut src);
        assert!(!cold.hot);
        assert_eq!(cold.rate, 0.02);
    }

    #[test]
    fn test_bands_are_not_renormalised() {
        let rules = MutationRules {
            hot_rate: 0.9,
            novel_fraction: 0.1,
            missing_fraction: 0.1,
            ..MutationRules::default()
        };
        let regime = rules.regime(true);
        assert!(regime.band_total() > 1.0);
        assert_eq!(regime.classify(0.95), MutationOutcome::Novel);
        assert_eq!(regime.classify(0.999), MutationOutcome::Missing);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let rules = MutationRules {
            cold_rate: -0.1,
            ..MutationRules::default()
        };
        assert!(rules.validate().is_err());
        let rules = MutationRules {
            skew_exponent: 0.0,
            ..MutationRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_skew_favours_small_ids() {
        let rules = MutationRules::default();
        assert_eq!(rules.skewed_allele(1.0), 0);
        assert_eq!(rules.skewed_allele(0.0), 100);
        let mut seq = SineSequence::new(3);
        let small = (0..10_000)
            .map(|_| rules.skewed_allele(seq.next_draw()))
            .filter(|&a| a <= 20)
            .count();
        assert!(small > 5_000, "only {} of 10000 ids were <= 20", small);
    }

    #[test]
    fn test_retyped_consumes_two_draws() {
        let rules = MutationRules::default();
        let regime = rules.regime(false);
        let mut src = ScriptedSource::new([0.001, 1.0], 0.5);
        let (value, outcome) = rules.mutate(AlleleValue::Known(1), &regime, &mut src);
        assert_eq!(outcome, MutationOutcome::Retyped);
        assert_eq!(value, AlleleValue::Known(0));
        assert_eq!(src.draws(), 2);
    }

    #[test]
    fn test_novel_token_takes_its_own_draw() {
        let rules = MutationRules::default();
        let regime = rules.regime(false);
        let mut src = ScriptedSource::new([0.0202, 0.37], 0.5);
        let (value, outcome) = rules.mutate(AlleleValue::Known(1), &regime, &mut src);
        assert_eq!(outcome, MutationOutcome::Novel);
        assert_eq!(value, AlleleValue::Novel(NovelToken::from_draw(0.37)));
        assert_eq!(src.draws(), 2);
    }

    #[test]
    fn test_absence_propagates_when_unchanged() {
        let rules = MutationRules::default();
        let regime = rules.regime(false);
        let mut src = ScriptedSource::new([0.7], 0.5);
        let (value, outcome) = rules.mutate(AlleleValue::Missing, &regime, &mut src);
        assert_eq!(outcome, MutationOutcome::Unchanged);
        assert_eq!(value, AlleleValue::Missing);
    }

    #[test]
    fn test_profile_draw_count_matches_tally() {
        let rules = MutationRules::default();
        let ancestor = Profile::uniform(1, 500);
        let mut src = CountingSource::new(SineSequence::new(11));
        let mut tally = MutationTally::default();
        let child = rules.mutate_profile(&ancestor, &mut src, &mut tally);
        assert_eq!(child.len(), 500);
        assert_eq!(src.draws(), 1 + 500 + tally.retyped + tally.novel);
        assert_eq!(src.draws(), tally.draws());
        assert_eq!(tally.unchanged + tally.retyped + tally.novel + tally.missing, 500);
    }

    #[test]
    fn test_frozen_rules_copy_ancestor() {
        let rules = MutationRules::frozen();
        let ancestor = Profile::from_alleles(vec![
            AlleleValue::Known(3),
            AlleleValue::Missing,
            AlleleValue::Novel(NovelToken(9)),
        ]);
        let mut src = SineSequence::new(1);
        let mut tally = MutationTally::default();
        let child = rules.mutate_profile(&ancestor, &mut src, &mut tally);
        assert_eq!(child, ancestor);
        assert_eq!(tally.unchanged, 3);
    }

    proptest! {
        #[test]
        fn prop_classify_is_total_and_ordered(r in 0.0f64..1.0, hot in any::<bool>()) {
            let regime = MutationRules::default().regime(hot);
            let outcome = regime.classify(r);
            let expected = if r < regime.rate {
                MutationOutcome::Retyped
            } else if r < regime.rate + regime.novel_rate {
                MutationOutcome::Novel
            } else if r < regime.band_total() {
                MutationOutcome::Missing
            } else {
                MutationOutcome::Unchanged
            };
            prop_assert_eq!(outcome, expected);
        }

        #[test]
        fn prop_skewed_allele_in_range(s in 0.0f64..1.0) {
            let rules = MutationRules::default();
            prop_assert!(rules.skewed_allele(s) <= rules.max_allele);
        }
    }
}
