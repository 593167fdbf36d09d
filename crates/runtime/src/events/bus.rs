//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use super::types::FightEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Fight started, finished, removed
    Lifecycle,
    /// Individual attack resolutions
    Combat,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Lifecycle, Topic::Combat];
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<FightEvent>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: FightEvent) {
        let topic = event.topic();

        // Events are best-effort: skip rather than wait on a contended lock.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("No subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<FightEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
