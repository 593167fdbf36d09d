use std::time::Duration;

/// Combat tuning parameters shared by the state machine and the scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Seconds the player has to act before an automatic plain attack fires.
    pub turn_timeout_secs: u64,
    /// Lower bound (inclusive) of the delay before a mob attacks.
    pub mob_delay_min_secs: u64,
    /// Upper bound (inclusive) of the delay before a mob attacks.
    pub mob_delay_max_secs: u64,
}

impl CombatConfig {
    pub const DEFAULT_TURN_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_MOB_DELAY_MIN_SECS: u64 = 1;
    pub const DEFAULT_MOB_DELAY_MAX_SECS: u64 = 4;

    pub const fn new() -> Self {
        Self {
            turn_timeout_secs: Self::DEFAULT_TURN_TIMEOUT_SECS,
            mob_delay_min_secs: Self::DEFAULT_MOB_DELAY_MIN_SECS,
            mob_delay_max_secs: Self::DEFAULT_MOB_DELAY_MAX_SECS,
        }
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Mob delay bounds, normalized so that `min <= max`.
    pub fn mob_delay_bounds(&self) -> (u64, u64) {
        if self.mob_delay_min_secs <= self.mob_delay_max_secs {
            (self.mob_delay_min_secs, self.mob_delay_max_secs)
        } else {
            (self.mob_delay_max_secs, self.mob_delay_min_secs)
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
