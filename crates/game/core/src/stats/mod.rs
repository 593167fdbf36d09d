//! Combatant stat snapshots.
//!
//! Derived stats are computed by the external stat provider from the
//! character and its equipment. The fight captures them once, at start, and
//! never re-fetches them mid-fight.
mod snapshot;

pub use snapshot::CombatantSnapshot;
