//! Process-wide map from player identity to that player's fight.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::instance::FightInstance;

pub(crate) type SharedInstance = Arc<Mutex<FightInstance>>;

/// At most one fight per player.
///
/// The map lock is held only for lookups and swaps, never across an instance
/// lock, so callers may lock an instance and then touch the registry.
#[derive(Default)]
pub(crate) struct FightRegistry {
    fights: RwLock<HashMap<String, SharedInstance>>,
}

impl FightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find(&self, player_id: &str) -> Option<SharedInstance> {
        self.fights.read().await.get(player_id).cloned()
    }

    /// Registers `instance` for `player_id` if the slot still holds `expected`
    /// (`None` meaning empty). Returns `false` when another fight got there first.
    pub async fn begin(
        &self,
        player_id: &str,
        instance: SharedInstance,
        expected: Option<&SharedInstance>,
    ) -> bool {
        let mut fights = self.fights.write().await;
        let unchanged = match (fights.get(player_id), expected) {
            (None, None) => true,
            (Some(current), Some(expected)) => Arc::ptr_eq(current, expected),
            _ => false,
        };
        if unchanged {
            fights.insert(player_id.to_string(), instance);
        }
        unchanged
    }

    /// Removes the player's entry if it is still `instance`.
    pub async fn end(&self, player_id: &str, instance: &SharedInstance) -> bool {
        let mut fights = self.fights.write().await;
        match fights.get(player_id) {
            Some(current) if Arc::ptr_eq(current, instance) => {
                fights.remove(player_id);
                true
            }
            _ => false,
        }
    }

    pub async fn all(&self) -> Vec<SharedInstance> {
        self.fights.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.fights.read().await.len()
    }
}
