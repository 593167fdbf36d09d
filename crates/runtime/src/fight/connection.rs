//! Send capability for an attached client.
use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::api::PushMessage;

/// Identifies one client connection for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Outbound half of a client connection.
///
/// Sends never block; a full or closed channel is reported as a failed send
/// and the fight detaches the connection.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::Sender<PushMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<PushMessage>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues `message` without waiting. Returns `false` if it was dropped.
    pub fn try_send(&self, message: PushMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                tracing::debug!(connection = %self.id, kind = message.kind(), "connection buffer full");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
