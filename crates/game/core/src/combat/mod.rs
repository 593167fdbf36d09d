//! Damage resolution engine.
//!
//! Pure functions computing the outcome of one attack from the attacker's and
//! defender's snapshots and an attack-type modifier. All randomness comes
//! from the supplied [`CombatRng`](crate::CombatRng).
//!
//! # Core Functions
//!
//! - `resolve_player_attack`: player → mob, single draw against cumulative
//!   dodge / block / crit thresholds
//! - `resolve_mob_attack`: mob → player, independent dodge → block → crit draws
//! - `apply_damage`: HP reduction (clamped to 0)

pub mod attack;
pub mod damage;
pub mod result;

pub use attack::AttackType;
pub use damage::{apply_damage, player_base_damage, resolve_mob_attack, resolve_player_attack};
pub use result::{AttackOutcome, AttackResult};
