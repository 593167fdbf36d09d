//! WebSocket connection gateway.
//!
//! Each socket gets one runtime [`Connection`]. Push messages from the fight
//! the socket is attached to are serialized and written as text frames; client
//! frames are parsed into [`ClientMessage`]s and dispatched to the runtime.
//! Closing the socket detaches it without ending the fight.
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};

use runtime::{Connection, PushMessage, RuntimeError, RuntimeHandle};

use crate::protocol::ClientMessage;

pub async fn fight_socket(ws: WebSocketUpgrade, State(handle): State<RuntimeHandle>) -> Response {
    ws.on_upgrade(move |socket| async move { run_socket(socket, handle).await })
}

async fn run_socket(socket: WebSocket, handle: RuntimeHandle) {
    let (connection, mut pushes) = handle.open_connection();
    let connection_id = connection.id();
    tracing::debug!(connection = %connection_id, "socket opened");

    let (mut ws_w, mut ws_r) = socket.split();
    let mut writer = tokio::spawn(async move {
        while let Some(push) = pushes.recv().await {
            let Some(frame) = encode(&push) else {
                continue;
            };
            if ws_w.send(frame).await.is_err() {
                break;
            }
        }
    });

    let mut session = Session::new(handle.clone(), connection);
    loop {
        tokio::select! {
            frame = ws_r.next() => {
                let Some(Ok(frame)) = frame else {
                    break;
                };
                match frame {
                    Message::Text(text) => session.handle_text(text.as_str()).await,
                    Message::Binary(_) => {
                        session.reject("invalid_message", "Expected a JSON text frame");
                    }
                    Message::Close(_) => break,
                    // tungstenite answers pings on the next write
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            }
            _ = &mut writer => break,
        }
    }
    writer.abort();

    if let Some(player_id) = session.player() {
        handle.disconnect(player_id, connection_id).await;
    }
    tracing::debug!(connection = %connection_id, "socket closed");
}

fn encode(push: &PushMessage) -> Option<Message> {
    match serde_json::to_string(push) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(err) => {
            tracing::warn!(kind = push.kind(), error = %err, "failed to encode push message");
            None
        }
    }
}

/// Per-socket dispatch state: the connection and the player it is bound to.
pub struct Session {
    handle: RuntimeHandle,
    connection: Connection,
    player: Option<String>,
}

impl Session {
    pub fn new(handle: RuntimeHandle, connection: Connection) -> Self {
        Self {
            handle,
            connection,
            player: None,
        }
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Parses and dispatches one text frame. Failures are pushed as `error`.
    pub async fn handle_text(&mut self, text: &str) {
        match ClientMessage::parse(text) {
            Ok(message) => {
                let kind = message.kind();
                if let Err(err) = self.dispatch(message).await {
                    tracing::debug!(
                        connection = %self.connection.id(),
                        player = self.player.as_deref().unwrap_or("-"),
                        kind,
                        error = %err,
                        "command rejected"
                    );
                    self.reject(err.code(), err.to_string());
                }
            }
            Err(err) => self.reject("invalid_message", format!("Malformed message: {err}")),
        }
    }

    async fn dispatch(&mut self, message: ClientMessage) -> Result<(), RuntimeError> {
        match message {
            ClientMessage::StartFight { player_id, mob_id } => {
                self.handle
                    .start_fight(&player_id, &mob_id, Some(self.connection.clone()))
                    .await?;
                self.bind(player_id).await;
            }
            ClientMessage::RejoinFight { player_id } => {
                self.handle
                    .rejoin(&player_id, self.connection.clone())
                    .await?;
                self.bind(player_id).await;
            }
            ClientMessage::Attack { attack_type } => {
                let player_id = self.player.as_deref().ok_or(RuntimeError::NoActiveFight)?;
                self.handle.attack(player_id, &attack_type).await?;
            }
            ClientMessage::LeaveFight {} => {
                let player_id = self.player.as_deref().ok_or(RuntimeError::NoActiveFight)?;
                self.handle.leave(player_id).await?;
            }
        }
        Ok(())
    }

    /// Switching players detaches this socket from the previous player's fight.
    async fn bind(&mut self, player_id: String) {
        if let Some(previous) = self.player.take()
            && previous != player_id
        {
            self.handle.disconnect(&previous, self.connection.id()).await;
        }
        self.player = Some(player_id);
    }

    fn reject(&self, code: &str, message: impl Into<String>) {
        self.connection.try_send(PushMessage::error(code, message));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use game_core::{CombatRng, TurnOwner};
    use game_core::testing::ScriptedRng;
    use runtime::Runtime;
    use tokio::sync::mpsc;

    use super::*;

    const HERO: &str = "hero@example.com";

    fn scripted_runtime() -> Runtime {
        Runtime::builder()
            .rng_source(|| Box::new(ScriptedRng::new()) as Box<dyn CombatRng>)
            .build()
    }

    fn drain(rx: &mut mpsc::Receiver<PushMessage>) -> Vec<PushMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    fn error_code(message: &PushMessage) -> Option<&str> {
        match message {
            PushMessage::Error { code, .. } => Some(code),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn commands_before_start_are_rejected() {
        let runtime = Runtime::builder().seeded(7).build();
        let handle = runtime.handle();
        let (connection, mut rx) = handle.open_connection();
        let mut session = Session::new(handle, connection);

        session
            .handle_text(r#"{"type":"attack","attack_type":"head"}"#)
            .await;
        session.handle_text("{").await;
        session
            .handle_text(r#"{"type":"start_fight","player_id":"x","mob_id":"Dragon"}"#)
            .await;

        let codes: Vec<_> = drain(&mut rx)
            .iter()
            .filter_map(error_code)
            .map(str::to_string)
            .collect();
        assert_eq!(codes, ["no_active_fight", "invalid_message", "unknown_mob"]);
        assert!(session.player().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn start_then_attack_streams_pushes() {
        let runtime = scripted_runtime();
        let handle = runtime.handle();
        let (connection, mut rx) = handle.open_connection();
        let mut session = Session::new(handle, connection);

        session
            .handle_text(&format!(
                r#"{{"type":"start_fight","player_id":"{HERO}","mob_id":"Krets"}}"#
            ))
            .await;
        assert_eq!(session.player(), Some(HERO));
        let messages = drain(&mut rx);
        assert!(matches!(messages[0], PushMessage::FightStarted { .. }));

        session
            .handle_text(r#"{"type":"attack","attack_type":"Legs"}"#)
            .await;
        let messages = drain(&mut rx);
        assert!(messages.iter().all(|message| error_code(message).is_none()));
        assert!(
            messages
                .iter()
                .any(|message| matches!(message, PushMessage::FightLog { .. }))
        );

        // The mob owns the turn until its delayed attack lands.
        session
            .handle_text(r#"{"type":"attack","attack_type":"head"}"#)
            .await;
        assert_eq!(error_code(&drain(&mut rx)[0]), Some("not_your_turn"));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        drain(&mut rx);
        session.handle_text(r#"{"type":"leave_fight"}"#).await;
        assert_eq!(error_code(&drain(&mut rx)[0]), Some("fight_active"));
    }

    #[tokio::test(start_paused = true)]
    async fn attack_without_string_type_is_invalid_message() {
        let runtime = scripted_runtime();
        let handle = runtime.handle();
        handle.start_fight(HERO, "Krets", None).await.unwrap();

        let (connection, mut rx) = handle.open_connection();
        let mut session = Session::new(handle.clone(), connection);
        session
            .handle_text(&format!(r#"{{"type":"rejoin_fight","player_id":"{HERO}"}}"#))
            .await;
        drain(&mut rx);

        for frame in [
            r#"{"type":"attack"}"#,
            r#"{"type":"attack","attack_type":5}"#,
            r#"{"type":"attack","attack_type":null}"#,
        ] {
            session.handle_text(frame).await;
            let messages = drain(&mut rx);
            assert_eq!(messages.len(), 1, "{frame}");
            assert_eq!(error_code(&messages[0]), Some("invalid_message"), "{frame}");
        }

        // Malformed frames never reach the fight.
        let fight = handle.active_fight(HERO).await.unwrap();
        assert_eq!(fight.state.turn_owner, TurnOwner::Player);
        assert_eq!(fight.log_history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejoin_binds_player_for_later_commands() {
        let runtime = scripted_runtime();
        let handle = runtime.handle();
        handle.start_fight(HERO, "Krets", None).await.unwrap();

        let (connection, mut rx) = handle.open_connection();
        let mut session = Session::new(handle, connection);
        session
            .handle_text(&format!(r#"{{"type":"rejoin_fight","player_id":"{HERO}"}}"#))
            .await;
        assert_eq!(session.player(), Some(HERO));
        let messages = drain(&mut rx);
        assert!(matches!(messages[0], PushMessage::FightRejoined { .. }));

        session
            .handle_text(r#"{"type":"attack","attack_type":"plain"}"#)
            .await;
        let messages = drain(&mut rx);
        assert_eq!(error_code(&messages[0]), Some("invalid_attack_type"));
    }
}
