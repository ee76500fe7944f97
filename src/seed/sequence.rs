//! SineSequence — the deterministic draw stream behind every fixture
//!
//! Each draw is a pure function of the seed and the number of draws taken so
//! far, so replaying a run with the same seed reproduces it bit-for-bit.
//! This is not a statistically strong generator and must never be used where
//! unpredictability matters.

use std::collections::VecDeque;

/// A source of draws in [0, 1).
///
/// All generation code pulls randomness through this trait so tests can
/// count or script the draws a step consumes.
pub trait DrawSource {
    /// Take the next draw.
    fn next_draw(&mut self) -> f64;

    /// Number of draws taken so far.
    fn draws(&self) -> u64;
}

impl<S: DrawSource + ?Sized> DrawSource for &mut S {
    fn next_draw(&mut self) -> f64 {
        (**self).next_draw()
    }

    fn draws(&self) -> u64 {
        (**self).draws()
    }
}

/// Fractional part of `sin(counter) * 10000`, counter starting at the seed.
#[derive(Debug, Clone)]
pub struct SineSequence {
    seed: u64,
    counter: u64,
}

impl SineSequence {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The counter the next draw will be computed from.
    pub fn counter(&self) -> u64 {
        self.counter
    }
}

impl DrawSource for SineSequence {
    fn next_draw(&mut self) -> f64 {
        let x = (self.counter as f64).sin() * 10_000.0;
        self.counter += 1;
        x - x.floor()
    }

    fn draws(&self) -> u64 {
        self.counter - self.seed
    }
}

/// Wraps another source and counts the draws taken through it.
#[derive(Debug)]
pub struct CountingSource<S> {
    inner: S,
    taken: u64,
}

impl<S: DrawSource> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, taken: 0 }
    }

    /// Reset the count without touching the wrapped source.
    pub fn reset(&mut self) {
        self.taken = 0;
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DrawSource> DrawSource for CountingSource<S> {
    fn next_draw(&mut self) -> f64 {
        self.taken += 1;
        self.inner.next_draw()
    }

    fn draws(&self) -> u64 {
        self.taken
    }
}

/// Replays a fixed list of draws, then falls back to a constant.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: VecDeque<f64>,
    fallback: f64,
    taken: u64,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            taken: 0,
        }
    }

    /// Draws still queued before the fallback kicks in.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DrawSource for ScriptedSource {
    fn next_draw(&mut self) -> f64 {
        self.taken += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }

    fn draws(&self) -> u64 {
        self.taken
    }
}
