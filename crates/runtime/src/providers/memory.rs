//! In-memory [`StatProvider`] used by the demo server and tests.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use game_core::FightStatus;

use crate::api::{FightSettlement, PlayerProfile, ProviderError, StatProvider};

#[derive(Debug, Clone)]
struct PlayerRecord {
    profile: PlayerProfile,
    history: Vec<FightSettlement>,
}

/// Keeps profiles and fight history in a map.
///
/// With auto-registration enabled, unknown players are created on first load
/// as novices named after their id.
#[derive(Debug, Default)]
pub struct InMemoryStatProvider {
    players: RwLock<HashMap<String, PlayerRecord>>,
    auto_register: bool,
}

impl InMemoryStatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_register() -> Self {
        Self {
            auto_register: true,
            ..Self::default()
        }
    }

    /// Seeds a player, replacing any existing record.
    pub fn with_player(mut self, player_id: impl Into<String>, profile: PlayerProfile) -> Self {
        self.players.get_mut().insert(
            player_id.into(),
            PlayerRecord {
                profile,
                history: Vec::new(),
            },
        );
        self
    }

    pub async fn insert_player(&self, player_id: impl Into<String>, profile: PlayerProfile) {
        self.players.write().await.insert(
            player_id.into(),
            PlayerRecord {
                profile,
                history: Vec::new(),
            },
        );
    }

    pub async fn profile(&self, player_id: &str) -> Option<PlayerProfile> {
        self.players
            .read()
            .await
            .get(player_id)
            .map(|record| record.profile.clone())
    }

    /// Settlements recorded for `player_id`, oldest first.
    pub async fn history(&self, player_id: &str) -> Vec<FightSettlement> {
        self.players
            .read()
            .await
            .get(player_id)
            .map(|record| record.history.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StatProvider for InMemoryStatProvider {
    async fn load_profile(&self, player_id: &str) -> Result<PlayerProfile, ProviderError> {
        if let Some(record) = self.players.read().await.get(player_id) {
            return Ok(record.profile.clone());
        }
        if !self.auto_register {
            return Err(ProviderError::PlayerNotFound(player_id.to_string()));
        }

        let mut players = self.players.write().await;
        let record = players
            .entry(player_id.to_string())
            .or_insert_with(|| {
                debug!(player = player_id, "registering novice player");
                PlayerRecord {
                    profile: PlayerProfile::novice(player_id, player_id),
                    history: Vec::new(),
                }
            });
        Ok(record.profile.clone())
    }

    async fn record_settlement(&self, settlement: &FightSettlement) -> Result<(), ProviderError> {
        let mut players = self.players.write().await;
        let record = players
            .get_mut(&settlement.player_id)
            .ok_or_else(|| ProviderError::PlayerNotFound(settlement.player_id.clone()))?;

        let profile = &mut record.profile;
        profile.current_hp = settlement.remaining_hp.clamp(1, profile.snapshot.max_hp.max(1));
        if let (FightStatus::Victory, Some(reward)) = (settlement.result, settlement.reward) {
            profile.copper += u64::from(reward.loot_copper);
            profile.experience = reward.experience;
            profile.snapshot.level = reward.new_level;
        }
        record.history.push(settlement.clone());
        Ok(())
    }
}
