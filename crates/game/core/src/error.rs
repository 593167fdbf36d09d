//! Errors raised by the fight state machine.
//!
//! These are local, recoverable rejections: the caller reports them to the
//! client and the fight state is left untouched.

use crate::fight::FightStatus;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FightError {
    /// The acting side does not own the current turn.
    #[error("not your turn")]
    NotYourTurn,

    /// The fight already reached a terminal state.
    #[error("fight is already over ({0})")]
    FightOver(FightStatus),

    /// Malformed or non-selectable attack type.
    #[error("invalid attack type: {0:?}")]
    InvalidAttackType(String),
}

impl FightError {
    /// Stable snake_case identifier used in protocol error payloads.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "not_your_turn",
            Self::FightOver(_) => "fight_over",
            Self::InvalidAttackType(_) => "invalid_attack_type",
        }
    }
}
