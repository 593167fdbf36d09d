//! Event payloads published by the fight runtime.

use serde::{Deserialize, Serialize};

use game_core::{AttackOutcome, FightStatus, Reward, TurnOwner};

use super::Topic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightEvent {
    /// A fight was created and registered.
    Started { player_id: String, mob_id: String },

    /// One attack was resolved against the fight state.
    AttackResolved {
        player_id: String,
        attacker: TurnOwner,
        outcome: AttackOutcome,
        damage: u32,
        /// Applied by the turn timeout rather than chosen by the player.
        automatic: bool,
    },

    /// The fight reached a terminal state.
    Finished {
        player_id: String,
        mob_id: String,
        result: FightStatus,
        reward: Option<Reward>,
    },

    /// The player acknowledged the result and the fight left the registry.
    Removed { player_id: String },
}

impl FightEvent {
    pub fn topic(&self) -> Topic {
        match self {
            FightEvent::AttackResolved { .. } => Topic::Combat,
            FightEvent::Started { .. } | FightEvent::Finished { .. } | FightEvent::Removed { .. } => {
                Topic::Lifecycle
            }
        }
    }
}
