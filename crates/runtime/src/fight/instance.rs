//! One live fight: the state machine plus everything time- and socket-bound.
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::AbortHandle;
use tokio::time::Instant;

use game_core::{
    AttackType, CombatConfig, CombatRng, FightError, FightOutcome, FightState, TurnOwner,
    TurnReport,
};

use crate::api::{ActiveFight, FightSettlement, FightView, PushMessage};

use super::connection::{Connection, ConnectionId};

/// Player-turn deadline, on the monotonic clock and as wall time for clients.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    pub at: Instant,
    pub wall: DateTime<Utc>,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        let wall = Utc::now() + TimeDelta::from_std(timeout).unwrap_or_else(|_| TimeDelta::zero());
        Self {
            at: Instant::now() + timeout,
            wall,
        }
    }

    fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

pub(crate) struct FightInstance {
    player_id: String,
    pub(crate) state: FightState,
    rng: Box<dyn CombatRng>,
    deadline: Option<Deadline>,
    connection: Option<Connection>,
    /// Bumped on every turn transition; timers act only on the value they captured.
    turn_seq: u64,
    timer: Option<AbortHandle>,
}

impl FightInstance {
    pub fn new(player_id: impl Into<String>, state: FightState, rng: Box<dyn CombatRng>) -> Self {
        Self {
            player_id: player_id.into(),
            state,
            rng,
            deadline: None,
            connection: None,
            turn_seq: 0,
            timer: None,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.turn_seq == seq
    }

    /// True once the player's turn deadline has passed, even if the timer has
    /// not fired yet.
    pub fn deadline_elapsed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline.at)
    }

    pub fn player_attack(&mut self, attack: AttackType) -> Result<TurnReport, FightError> {
        self.state.player_attack(attack, &mut *self.rng)
    }

    pub fn auto_attack(&mut self) -> Result<TurnReport, FightError> {
        self.state.auto_attack(&mut *self.rng)
    }

    pub fn mob_attack(&mut self) -> Result<TurnReport, FightError> {
        self.state.mob_attack(&mut *self.rng)
    }

    /// Draws the mob's think time, in whole seconds within the configured bounds.
    pub fn mob_delay(&mut self, config: &CombatConfig) -> Duration {
        let (min, max) = config.mob_delay_bounds();
        let clamp = |secs: u64| u32::try_from(secs).unwrap_or(u32::MAX);
        let secs = self.rng.range(clamp(min), clamp(max));
        Duration::from_secs(u64::from(secs))
    }

    /// Hands the turn to the player and returns the sequence number and
    /// deadline the new turn timer must carry.
    pub fn begin_player_turn(&mut self, timeout: Duration) -> (u64, Instant) {
        self.advance();
        let deadline = Deadline::after(timeout);
        self.deadline = Some(deadline);
        self.check_invariants();
        (self.turn_seq, deadline.at)
    }

    /// Hands the turn to the mob and returns the new sequence number.
    pub fn begin_mob_turn(&mut self) -> u64 {
        self.advance();
        self.deadline = None;
        self.check_invariants();
        self.turn_seq
    }

    /// Stops all timers after a terminal transition.
    pub fn end(&mut self) {
        self.advance();
        self.deadline = None;
        self.check_invariants();
    }

    pub fn set_timer(&mut self, timer: AbortHandle) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Forgets the stored timer without aborting it. Called by the timer task
    /// that is currently firing.
    pub fn release_timer(&mut self) {
        self.timer = None;
    }

    fn advance(&mut self) {
        self.turn_seq += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(Connection::id)
    }

    /// Attaches `connection`, returning the one it replaced.
    pub fn attach(&mut self, connection: Connection) -> Option<Connection> {
        self.connection.replace(connection)
    }

    /// Detaches only if `id` is the attached connection.
    pub fn detach(&mut self, id: ConnectionId) -> bool {
        if self.connection_id() == Some(id) {
            self.connection = None;
            true
        } else {
            false
        }
    }

    /// Best-effort push to the attached client. A failed send detaches it.
    pub fn push(&mut self, message: PushMessage) {
        let Some(connection) = &self.connection else {
            return;
        };
        if !connection.try_send(message) {
            tracing::debug!(
                target: "runtime::fight",
                player = %self.player_id,
                connection = %connection.id(),
                "send failed, detaching connection"
            );
            self.connection = None;
        }
    }

    pub fn push_log(&mut self, entries: &[String]) {
        for text in entries {
            self.push(PushMessage::FightLog { text: text.clone() });
        }
    }

    pub fn view(&self) -> FightView {
        FightView::new(
            &self.player_id,
            &self.state,
            self.deadline.map(|deadline| deadline.wall),
        )
    }

    pub fn active(&self) -> ActiveFight {
        ActiveFight {
            state: self.view(),
            log_history: self.state.log().entries().to_vec(),
        }
    }

    pub fn turn_update(&self) -> PushMessage {
        PushMessage::TurnUpdate {
            turn_owner: self.state.turn_owner(),
            deadline: self.deadline.map(|deadline| deadline.wall),
            remaining_ms: self
                .deadline
                .map(|deadline| u64::try_from(deadline.remaining().as_millis()).unwrap_or(u64::MAX)),
        }
    }

    pub fn fight_over(&self, outcome: &FightOutcome) -> PushMessage {
        let reward = outcome.reward.unwrap_or_default();
        PushMessage::FightOver {
            result: outcome.status,
            message: outcome.message.clone(),
            loot_copper: reward.loot_copper,
            exp_gained: reward.exp_gained,
            leveled_up: reward.leveled_up,
            new_level: outcome
                .reward
                .map_or(self.state.player().level, |reward| reward.new_level),
            stats: *self.state.stats(),
            state: self.view(),
        }
    }

    pub fn settlement(&self, outcome: &FightOutcome) -> FightSettlement {
        FightSettlement {
            player_id: self.player_id.clone(),
            mob_id: self.state.mob().id.clone(),
            mob_level: self.state.mob().level,
            player_level: self.state.player().level,
            result: outcome.status,
            remaining_hp: self.state.player_hp().max(1),
            reward: outcome.reward,
            stats: *self.state.stats(),
        }
    }

    fn check_invariants(&self) {
        let player_turn =
            !self.state.is_over() && self.state.turn_owner() == TurnOwner::Player;
        debug_assert_eq!(
            self.deadline.is_some(),
            player_turn,
            "deadline must exist exactly on an ongoing player turn"
        );
    }
}
