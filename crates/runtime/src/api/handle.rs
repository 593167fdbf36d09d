//! Cloneable façade for driving fights.
//!
//! [`RuntimeHandle`] hides the registry, instance locking and timer plumbing
//! behind async helpers the connection gateway calls once per client message.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use game_core::MobDefinition;

use super::errors::Result;
use super::messages::{ActiveFight, FightView, PushMessage};
use crate::events::{EventBus, FightEvent, Topic};
use crate::fight::service::FightService;
use crate::fight::{Connection, ConnectionId};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    service: Arc<FightService>,
}

impl RuntimeHandle {
    pub(crate) fn new(service: Arc<FightService>) -> Self {
        Self { service }
    }

    /// Allocates a connection with a process-unique id.
    ///
    /// Push messages for whichever fight the connection gets attached to
    /// arrive on the returned receiver.
    pub fn open_connection(&self) -> (Connection, mpsc::Receiver<PushMessage>) {
        self.service.open_connection()
    }

    /// Starts a fight against `mob_id` with the player to act first.
    ///
    /// Fails with `AlreadyFighting` while the player has an ongoing fight. A
    /// finished fight that was never left is replaced.
    pub async fn start_fight(
        &self,
        player_id: &str,
        mob_id: &str,
        connection: Option<Connection>,
    ) -> Result<FightView> {
        self.service.start_fight(player_id, mob_id, connection).await
    }

    /// Applies a player-chosen attack (`head`, `chest` or `legs`).
    pub async fn attack(&self, player_id: &str, attack_type: &str) -> Result<()> {
        self.service.attack(player_id, attack_type).await
    }

    /// Acknowledges a finished fight and removes it. Fails with `FightActive`
    /// while the fight is ongoing.
    pub async fn leave(&self, player_id: &str) -> Result<()> {
        self.service.leave(player_id).await
    }

    /// Attaches `connection` to the player's fight and replays its state and log.
    pub async fn rejoin(&self, player_id: &str, connection: Connection) -> Result<ActiveFight> {
        self.service.rejoin(player_id, connection).await
    }

    /// Detaches `connection_id` if it is still the player's attached connection.
    /// The fight keeps running either way.
    pub async fn disconnect(&self, player_id: &str, connection_id: ConnectionId) -> bool {
        self.service.disconnect(player_id, connection_id).await
    }

    /// Read-only view of the player's ongoing fight. `None` once the fight
    /// has reached Victory or Defeat.
    pub async fn active_fight(&self, player_id: &str) -> Option<ActiveFight> {
        self.service.active_fight(player_id).await
    }

    /// Number of registered fights, finished ones included.
    pub async fn fight_count(&self) -> usize {
        self.service.fight_count().await
    }

    pub fn region_mobs(&self, region: &str) -> Vec<MobDefinition> {
        self.service.region_mobs(region)
    }

    /// Ends every ongoing fight in defeat, as on shutdown.
    pub async fn forfeit_all(&self) -> usize {
        self.service.forfeit_all().await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Lifecycle` - Fight started, finished and removed
    /// - `Topic::Combat` - Every resolved attack
    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<FightEvent> {
        self.service.event_bus().subscribe(topic).await
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        self.service.event_bus()
    }
}
