//! Server → client payloads.
//!
//! Every message serializes as a JSON object tagged by `"type"`, so the
//! gateway can forward [`PushMessage`] values to the socket unchanged.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::{FightState, FightStats, FightStatus, TurnOwner};

/// Client-facing snapshot of a fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightView {
    pub player_id: String,
    pub player_name: String,
    pub player_level: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub player_mana: u32,
    pub player_max_mana: u32,
    pub mob_id: String,
    pub mob_name: String,
    pub mob_level: u32,
    pub mob_hp: u32,
    pub mob_max_hp: u32,
    pub turn_owner: TurnOwner,
    pub status: FightStatus,
    /// Present only while the player owns an ongoing turn.
    pub deadline: Option<DateTime<Utc>>,
}

impl FightView {
    pub fn new(player_id: &str, state: &FightState, deadline: Option<DateTime<Utc>>) -> Self {
        let player = state.player();
        let mob = state.mob();
        Self {
            player_id: player_id.to_string(),
            player_name: player.nickname.clone(),
            player_level: player.level,
            player_hp: state.player_hp(),
            player_max_hp: player.max_hp,
            player_mana: state.player_mana(),
            player_max_mana: player.max_mana,
            mob_id: mob.id.clone(),
            mob_name: mob.display_name.clone(),
            mob_level: mob.level,
            mob_hp: state.mob_hp(),
            mob_max_hp: mob.max_hp,
            turn_owner: state.turn_owner(),
            status: state.status(),
            deadline,
        }
    }
}

/// A fight as seen by a returning client: current state plus the full log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFight {
    pub state: FightView,
    pub log_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    FightStarted {
        state: FightView,
        log: Vec<String>,
    },
    /// One appended log entry.
    FightLog {
        text: String,
    },
    TurnUpdate {
        turn_owner: TurnOwner,
        #[serde(skip_serializing_if = "Option::is_none")]
        deadline: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining_ms: Option<u64>,
    },
    FightRejoined {
        state: FightView,
        log_history: Vec<String>,
    },
    FightOver {
        result: FightStatus,
        message: String,
        loot_copper: u32,
        exp_gained: u32,
        leveled_up: bool,
        new_level: u32,
        stats: FightStats,
        state: FightView,
    },
    FightLeft {
        message: String,
    },
    Error {
        code: String,
        message: String,
    },
}

impl PushMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        PushMessage::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Value of the `"type"` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PushMessage::FightStarted { .. } => "fight_started",
            PushMessage::FightLog { .. } => "fight_log",
            PushMessage::TurnUpdate { .. } => "turn_update",
            PushMessage::FightRejoined { .. } => "fight_rejoined",
            PushMessage::FightOver { .. } => "fight_over",
            PushMessage::FightLeft { .. } => "fight_left",
            PushMessage::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_tagged_by_type() {
        let json = serde_json::to_value(PushMessage::FightLog {
            text: "Hero deals 19 damage to Krets [1].".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "fight_log");
        assert_eq!(json["text"], "Hero deals 19 damage to Krets [1].");

        let json = serde_json::to_value(PushMessage::TurnUpdate {
            turn_owner: TurnOwner::Mob,
            deadline: None,
            remaining_ms: None,
        })
        .unwrap();
        assert_eq!(json["type"], "turn_update");
        assert_eq!(json["turn_owner"], "Mob");
        assert!(json.get("deadline").is_none());
    }

    #[test]
    fn error_payload_carries_code() {
        let json = serde_json::to_value(PushMessage::error("not_your_turn", "not your turn")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "not_your_turn");
    }
}
