//! Client → server messages on the fight socket.
use serde::Deserialize;

/// One JSON text frame from the client, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartFight { player_id: String, mob_id: String },
    Attack { attack_type: String },
    LeaveFight {},
    RejoinFight { player_id: String },
}

impl ClientMessage {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::StartFight { .. } => "start_fight",
            ClientMessage::Attack { .. } => "attack",
            ClientMessage::LeaveFight {} => "leave_fight",
            ClientMessage::RejoinFight { .. } => "rejoin_fight",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_message_type() {
        assert_eq!(
            ClientMessage::parse(r#"{"type":"start_fight","player_id":"a@b.c","mob_id":"Krets"}"#)
                .unwrap(),
            ClientMessage::StartFight {
                player_id: "a@b.c".into(),
                mob_id: "Krets".into(),
            }
        );
        assert_eq!(
            ClientMessage::parse(r#"{"type":"attack","attack_type":"HEAD"}"#).unwrap(),
            ClientMessage::Attack {
                attack_type: "HEAD".into()
            }
        );
        assert_eq!(
            ClientMessage::parse(r#"{"type":"leave_fight"}"#).unwrap(),
            ClientMessage::LeaveFight {}
        );
        assert_eq!(
            ClientMessage::parse(r#"{"type":"rejoin_fight","player_id":"a@b.c"}"#)
                .unwrap()
                .kind(),
            "rejoin_fight"
        );
    }

    #[test]
    fn rejects_unknown_or_incomplete_messages() {
        assert!(ClientMessage::parse(r#"{"type":"heal"}"#).is_err());
        assert!(ClientMessage::parse(r#"{"type":"attack"}"#).is_err());
        assert!(ClientMessage::parse("not json").is_err());
    }
}
