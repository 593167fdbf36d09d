//! The per-fight state machine and its bookkeeping.
mod log;
mod state;
mod stats;

pub use log::FightLog;
pub use state::{FightOutcome, FightState, FightStatus, TurnOwner, TurnReport};
pub use stats::FightStats;
