//! Turn-based combat rules shared by the fight runtime and content tooling.
//!
//! `game-core` is synchronous and free of I/O: it defines the combatant
//! snapshots, the damage resolution engine, the reward calculator and the
//! [`FightState`] state machine. Timers, connections and persistence live in
//! the `runtime` crate, which drives the types re-exported here.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod fight;
pub mod reward;
pub mod stats;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use combat::{AttackOutcome, AttackResult, AttackType, resolve_mob_attack, resolve_player_attack};
pub use config::CombatConfig;
pub use env::{CombatRng, MobDefinition, MobOracle, ability_chance};
pub use error::FightError;
pub use fight::{
    FightLog, FightOutcome, FightState, FightStats, FightStatus, TurnOwner, TurnReport,
};
pub use reward::{
    Reward, apply_experience, calculate_reward, exp_required_for_level, format_copper,
    level_penalty_percent,
};
pub use stats::CombatantSnapshot;
