use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::ops::RangeInclusive;

use crate::history::History;

/// Values shown to the player.
pub const VALUE_RANGE: RangeInclusive<u8> = 1..=5;

/// Share of trials deliberately generated as n-back matches.
pub const MATCH_PROBABILITY: f64 = 0.4;

/// Produces the value for the next trial
pub trait TrialSource: Debug + Send {
    fn next_value(&mut self, history: &History) -> u8;
}

/// Random trial generator biased towards n-back matches.
///
/// Once the history holds an n-back target, each trial repeats it with
/// probability [`MATCH_PROBABILITY`]; otherwise a value different from the
/// target is drawn, so a trial is a match exactly when the biased path fires.
#[derive(Debug)]
pub struct TrialGenerator<R = StdRng> {
    rng: R,
}

impl TrialGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence, used by `--seed` and tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for TrialGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TrialGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, target: Option<u8>) -> u8 {
        match target {
            Some(value) if self.rng.gen_bool(MATCH_PROBABILITY) => value,
            _ => self.draw_non_match(target),
        }
    }

    /// Uniform draw from [`VALUE_RANGE`] that never equals `target`.
    pub fn draw_non_match(&mut self, target: Option<u8>) -> u8 {
        loop {
            let value = self.rng.gen_range(VALUE_RANGE);
            if Some(value) != target {
                return value;
            }
        }
    }
}

impl<R: Rng + Debug + Send> TrialSource for TrialGenerator<R> {
    fn next_value(&mut self, history: &History) -> u8 {
        self.generate(history.n_back_target())
    }
}

/// Plays back a fixed sequence of values.
///
/// Repeats the last value once the script runs out; an empty script yields
/// the lowest value in [`VALUE_RANGE`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrials {
    values: VecDeque<u8>,
    last: Option<u8>,
}

impl ScriptedTrials {
    pub fn new<I: IntoIterator<Item = u8>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: None,
        }
    }

    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl TrialSource for ScriptedTrials {
    fn next_value(&mut self, _history: &History) -> u8 {
        if let Some(value) = self.values.pop_front() {
            self.last = Some(value);
        }
        self.last.unwrap_or(*VALUE_RANGE.start())
    }
}
