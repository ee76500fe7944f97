//! RegressionGuard — certifies a run reproduced the checked-in fixture
//!
//! The next draw after generation pins down the exact number of draws the
//! whole run consumed, so any change to the draw order of the mutation model
//! or the builder shows up here before a single document is written.

use crate::error::{FixtureError, Result};
use crate::seed::DrawSource;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Next draw after generating the canonical fixture (seed 1, 2000 loci, 7000 profiles)
pub const CANONICAL_NEXT_DRAW: f64 = 0.19474356789214653;
/// Manifest plus one document per canonical genome
pub const CANONICAL_RECORDS: usize = 7001;
/// Manifest plus one document per public canonical genome
pub const CANONICAL_VISIBLE_RECORDS: usize = 5574;

/// Expected end state of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionExpectation {
    pub next_draw: f64,
    /// Manifest plus genome documents when every genome is emitted
    pub records: usize,
    /// Manifest plus genome documents when only public genomes are emitted
    pub visible_records: usize,
}

impl RegressionExpectation {
    pub fn canonical() -> Self {
        Self {
            next_draw: CANONICAL_NEXT_DRAW,
            records: CANONICAL_RECORDS,
            visible_records: CANONICAL_VISIBLE_RECORDS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegressionGuard {
    expectation: RegressionExpectation,
}

impl RegressionGuard {
    pub fn new(expectation: RegressionExpectation) -> Self {
        Self { expectation }
    }

    /// Take one draw from `src` and compare it and `records` against the
    /// expectation. Auxiliary documents are not part of `records`.
    ///
    /// The draw must match bit for bit.
    pub fn check<S: DrawSource>(&self, src: &mut S, records: usize, visible_only: bool) -> Result<()> {
        let next = src.next_draw();
        let expected = self.expectation.next_draw;
        if next.to_bits() != expected.to_bits() {
            warn!(
                "Next draw differs from expectation by {:e} ({:#018x} vs {:#018x})",
                next - expected,
                next.to_bits(),
                expected.to_bits()
            );
            return Err(FixtureError::Regression(format!(
                "next draw after {} draws was {}, expected {}",
                src.draws() - 1,
                next,
                expected
            )));
        }
        let expected = if visible_only {
            self.expectation.visible_records
        } else {
            self.expectation.records
        };
        if records != expected {
            return Err(FixtureError::Regression(format!(
                "fixture has {} records, expected {}",
                records, expected
            )));
        }
        info!("Regression check passed: next draw {}, {} records", next, records);
        Ok(())
    }
}
