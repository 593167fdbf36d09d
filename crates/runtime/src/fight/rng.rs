//! `rand`-backed combat randomness.
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use game_core::CombatRng;

/// Creates the random source for each new fight.
pub type RngSource = Arc<dyn Fn() -> Box<dyn CombatRng> + Send + Sync>;

/// [`CombatRng`] over [`StdRng`].
#[derive(Debug, Clone)]
pub struct StdCombatRng(StdRng);

impl StdCombatRng {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Source giving every fight its own entropy-seeded generator.
    pub fn source() -> RngSource {
        Arc::new(|| Box::new(Self::from_entropy()) as Box<dyn CombatRng>)
    }
}

impl CombatRng for StdCombatRng {
    fn roll(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.gen_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_bounds() {
        let mut rng = StdCombatRng::seeded(42);
        for _ in 0..1_000 {
            let roll = rng.roll();
            assert!((0.0..1.0).contains(&roll));
            assert!((1..=4).contains(&rng.range(1, 4)));
            let factor = rng.factor(0.8, 1.2);
            assert!((0.8..=1.2).contains(&factor));
        }
        assert_eq!(rng.range(5, 5), 5);
        assert_eq!(rng.range(9, 3), 9);
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = StdCombatRng::seeded(7);
        let mut b = StdCombatRng::seeded(7);
        for _ in 0..16 {
            assert_eq!(a.range(40, 112), b.range(40, 112));
        }
    }
}
