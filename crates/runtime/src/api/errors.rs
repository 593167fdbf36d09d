//! Unified error types surfaced by the runtime API.
//!
//! Wraps rejections from the fight state machine and failures from the stat
//! provider so the gateway can map every failure onto a stable protocol code.
use thiserror::Error;

use game_core::FightError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player {player_id:?} already has an ongoing fight")]
    AlreadyFighting { player_id: String },

    #[error("fight is still in progress")]
    FightActive,

    #[error("no active fight")]
    NoActiveFight,

    #[error("unknown mob {0:?}")]
    UnknownMob(String),

    #[error(transparent)]
    Fight(#[from] FightError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RuntimeError {
    /// Stable snake_case identifier used in protocol error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::AlreadyFighting { .. } => "already_fighting",
            RuntimeError::FightActive => "fight_active",
            RuntimeError::NoActiveFight => "no_active_fight",
            RuntimeError::UnknownMob(_) => "unknown_mob",
            RuntimeError::Fight(err) => err.code(),
            RuntimeError::Provider(err) => err.code(),
        }
    }
}

/// Failures reported by a [`crate::StatProvider`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("player {0:?} not found")]
    PlayerNotFound(String),

    #[error("stat storage failure: {0}")]
    Storage(String),
}

impl ProviderError {
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::PlayerNotFound(_) => "player_not_found",
            ProviderError::Storage(_) => "internal",
        }
    }
}
