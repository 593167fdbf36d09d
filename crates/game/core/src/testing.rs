//! Deterministic helpers for tests in this crate and downstream crates.

use std::collections::VecDeque;

use crate::env::CombatRng;

/// [`CombatRng`] that replays scripted values.
///
/// Each draw pops from its own queue. When a queue runs dry:
/// `roll` returns 0.99 (a plain hit),
/// `range` returns `min`, and `factor` returns the midpoint of the interval.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    ranges: VecDeque<u32>,
    factors: VecDeque<f64>,
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self {
            rolls: VecDeque::new(),
            ranges: VecDeque::new(),
            factors: VecDeque::new(),
        }
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = u32>) -> Self {
        self.ranges.extend(ranges);
        self
    }

    pub fn with_factors(mut self, factors: impl IntoIterator<Item = f64>) -> Self {
        self.factors.extend(factors);
        self
    }

}

impl CombatRng for ScriptedRng {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.99)
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = (min.min(max), min.max(max));
        self.ranges
            .pop_front()
            .map(|value| value.clamp(lo, hi))
            .unwrap_or(lo)
    }

    fn factor(&mut self, low: f64, high: f64) -> f64 {
        self.factors
            .pop_front()
            .unwrap_or((low + high) / 2.0)
    }
}
