//! Asynchronous abstraction over persisted player stats.
//!
//! The runtime reads a [`PlayerProfile`] when a fight starts and hands a
//! [`FightSettlement`] back when it ends. Storage is entirely the provider's
//! concern: the runtime never retries and never lets a write failure change a
//! fight's result.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use game_core::{CombatantSnapshot, FightStats, FightStatus, Reward};

use super::errors::ProviderError;

/// Persisted state of a player, as needed to start a fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub snapshot: CombatantSnapshot,
    pub current_hp: u32,
    /// Experience carried toward the next level.
    pub experience: u64,
    pub copper: u64,
}

impl PlayerProfile {
    /// A fresh level-1 character at full health.
    pub fn novice(player_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        let snapshot = CombatantSnapshot::novice(player_id, nickname);
        Self {
            current_hp: snapshot.max_hp,
            snapshot,
            experience: 0,
            copper: 0,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.snapshot.nickname
    }
}

/// What a finished fight changes about the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightSettlement {
    pub player_id: String,
    pub mob_id: String,
    pub mob_level: u32,
    /// Player level when the fight started.
    pub player_level: u32,
    pub result: FightStatus,
    /// Player HP after the fight, at least 1.
    pub remaining_hp: u32,
    /// Present on victory.
    pub reward: Option<Reward>,
    pub stats: FightStats,
}

/// Source and sink of player stats.
///
/// Implementations must be cheap to share across tasks; the runtime holds one
/// behind an `Arc` and calls it outside any fight lock.
#[async_trait]
pub trait StatProvider: Send + Sync {
    /// Loads the profile a new fight is built from.
    async fn load_profile(&self, player_id: &str) -> Result<PlayerProfile, ProviderError>;

    /// Persists the result of a finished fight.
    async fn record_settlement(&self, settlement: &FightSettlement) -> Result<(), ProviderError>;
}
