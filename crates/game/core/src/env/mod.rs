//! Read-only combat data and the randomness seam.
//!
//! Mob definitions are static catalog entries loaded at startup and never
//! mutated. The [`MobOracle`] trait lets the runtime supply them without the
//! rules depending on a concrete catalog.
mod mob;
mod rng;

pub use mob::{MobDefinition, MobOracle, ability_chance};
pub use rng::CombatRng;
