//! Experience, loot and level progression.
//!
//! Rewards are computed once, on the transition to victory, and returned to
//! the caller for persistence. Nothing here touches storage.

use crate::env::{CombatRng, MobDefinition};

const COPPER_PER_SILVER: u64 = 100;
const COPPER_PER_GOLD: u64 = COPPER_PER_SILVER * 100;

/// Reward scaling by level difference, in percent.
///
/// `diff = player_level − mob_level`:
/// `≤ 0 → 100`, `1 → 70`, `2 → 40`, `3 → 10`, `≥ 4 → 0`.
pub fn level_penalty_percent(player_level: u32, mob_level: u32) -> u32 {
    match i64::from(player_level) - i64::from(mob_level) {
        diff if diff <= 0 => 100,
        1 => 70,
        2 => 40,
        3 => 10,
        _ => 0,
    }
}

/// Experience needed to advance from `level` to `level + 1`: `100 × 2^(level − 1)`.
pub fn exp_required_for_level(level: u32) -> u64 {
    let shift = level.saturating_sub(1);
    1u64.checked_shl(shift)
        .and_then(|factor| factor.checked_mul(100))
        .unwrap_or(u64::MAX)
}

/// Runs the level-up cascade.
///
/// Returns `(level, remaining_experience, leveled_up)`.
pub fn apply_experience(level: u32, experience: u64) -> (u32, u64, bool) {
    let mut level = level.max(1);
    let mut experience = experience;
    let mut leveled_up = false;

    loop {
        let required = exp_required_for_level(level);
        if experience < required || level == u32::MAX {
            break;
        }
        experience -= required;
        level += 1;
        leveled_up = true;
    }

    (level, experience, leveled_up)
}

/// Everything a victory grants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub exp_gained: u32,
    pub loot_copper: u32,
    pub leveled_up: bool,
    /// Player level after the cascade.
    pub new_level: u32,
    /// Experience carried toward the next level after the cascade.
    pub experience: u64,
}

impl Reward {
    pub fn is_empty(&self) -> bool {
        self.exp_gained == 0 && self.loot_copper == 0
    }
}

/// Computes the reward for defeating `mob`.
///
/// The loot roll is skipped entirely when the level penalty zeroes the reward.
pub fn calculate_reward(
    player_level: u32,
    player_experience: u64,
    mob: &MobDefinition,
    rng: &mut (impl CombatRng + ?Sized),
) -> Reward {
    let percent = level_penalty_percent(player_level, mob.level);

    let (exp_gained, loot_copper) = if percent == 0 {
        (0, 0)
    } else {
        let loot = rng.range(mob.loot_copper_min, mob.loot_copper_max);
        (scale(mob.base_exp, percent), scale(loot, percent))
    };

    let (new_level, experience, leveled_up) =
        apply_experience(player_level, player_experience + u64::from(exp_gained));

    Reward {
        exp_gained,
        loot_copper,
        leveled_up,
        new_level,
        experience,
    }
}

fn scale(value: u32, percent: u32) -> u32 {
    (u64::from(value) * u64::from(percent) / 100) as u32
}

/// Renders copper as `Xg Ys Zc`, omitting leading zero denominations.
///
/// ```
/// use game_core::format_copper;
/// assert_eq!(format_copper(40), "40c");
/// assert_eq!(format_copper(112), "1s 12c");
/// assert_eq!(format_copper(10_005), "1g 0s 5c");
/// ```
pub fn format_copper(copper: u64) -> String {
    let gold = copper / COPPER_PER_GOLD;
    let silver = (copper % COPPER_PER_GOLD) / COPPER_PER_SILVER;
    let rest = copper % COPPER_PER_SILVER;

    if gold > 0 {
        format!("{gold}g {silver}s {rest}c")
    } else if silver > 0 {
        format!("{silver}s {rest}c")
    } else {
        format!("{rest}c")
    }
}
