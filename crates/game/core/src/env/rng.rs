//! Random draws consumed by combat resolution.
//!
//! Every probabilistic step in the damage and reward pipelines goes through
//! [`CombatRng`], so a fight is fully determined by the sequence of values the
//! implementation returns. The runtime backs it with `rand`; tests script it.

/// Source of uniform random draws for one fight.
pub trait CombatRng: Send {
    /// Uniform draw in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform integer in `[min, max]` inclusive. Returns `min` when `min >= max`.
    fn range(&mut self, min: u32, max: u32) -> u32;

    /// Uniform real in `[low, high]`.
    fn factor(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.roll()
    }
}

impl<R: CombatRng + ?Sized> CombatRng for Box<R> {
    fn roll(&mut self) -> f64 {
        (**self).roll()
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        (**self).range(min, max)
    }

    fn factor(&mut self, low: f64, high: f64) -> f64 {
        (**self).factor(low, high)
    }
}
