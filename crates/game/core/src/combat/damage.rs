//! Damage calculation and application.

use crate::env::{CombatRng, MobDefinition};
use crate::stats::CombatantSnapshot;

use super::attack::AttackType;
use super::result::{AttackOutcome, AttackResult};

/// Spread applied to the player's base damage.
const DAMAGE_SPREAD: (f64, f64) = (0.8, 1.2);
const BLOCK_MULTIPLIER: f64 = 0.5;
const CRIT_MULTIPLIER: f64 = 1.5;

/// Player base damage before randomization: `strength / 5 + weapon_damage`, at least 1.
pub fn player_base_damage(attacker: &CombatantSnapshot) -> u32 {
    (attacker.strength / 5 + attacker.weapon_damage).max(1)
}

/// Resolve a player attack against a mob.
///
/// # Formula
///
/// ```text
/// damage = floor(base × spread × zone_multiplier), at least 1
/// r      = roll()
/// dodge  = mob_dodge + zone_evade_modifier
///
/// r < dodge                      → Dodge, 0
/// r < dodge + block              → Block, max(1, floor(damage × 0.5))
/// r < dodge + block + crit       → Critical, floor(damage × 1.5)
/// otherwise                      → Hit, damage
/// ```
///
/// The spread factor is drawn before `r`.
pub fn resolve_player_attack(
    attacker: &CombatantSnapshot,
    defender: &MobDefinition,
    attack: AttackType,
    rng: &mut (impl CombatRng + ?Sized),
) -> AttackResult {
    let spread = rng.factor(DAMAGE_SPREAD.0, DAMAGE_SPREAD.1);
    let raw = f64::from(player_base_damage(attacker)) * spread * attack.damage_multiplier();
    let damage = (raw.floor() as u32).max(1);

    let dodge = (defender.dodge_chance() + attack.evade_modifier()).max(0.0);
    let block = dodge + defender.block_chance();
    let crit = block + attacker.crit_chance.max(0.0);

    let r = rng.roll();
    if r < dodge {
        AttackResult::dodged()
    } else if r < block {
        AttackResult::new(AttackOutcome::Block, scale(damage, BLOCK_MULTIPLIER).max(1))
    } else if r < crit {
        AttackResult::new(AttackOutcome::Critical, scale(damage, CRIT_MULTIPLIER))
    } else {
        AttackResult::new(AttackOutcome::Hit, damage)
    }
}

/// Resolve a mob attack against the player.
///
/// Base damage is drawn uniformly from the mob's damage range, then dodge,
/// block and crit are checked with independent draws in that order:
///
/// ```text
/// dodge → 0
/// block → max(1, base / 2), reduced by damage_reduction
/// crit  → floor(base × 1.5) − defense / 4 (at least 1), reduced by damage_reduction
/// hit   → base − defense / 4 (at least 1), reduced by damage_reduction
/// ```
pub fn resolve_mob_attack(
    attacker: &MobDefinition,
    defender: &CombatantSnapshot,
    rng: &mut (impl CombatRng + ?Sized),
) -> AttackResult {
    let base = rng.range(attacker.damage_min, attacker.damage_max);

    if rng.roll() < defender.dodge_chance {
        return AttackResult::dodged();
    }

    if rng.roll() < defender.block_chance {
        let blocked = (base / 2).max(1);
        return AttackResult::new(AttackOutcome::Block, reduce(blocked, defender));
    }

    if rng.roll() < attacker.crit_chance() {
        let crit = scale(base, CRIT_MULTIPLIER)
            .saturating_sub(defender.defense_mitigation())
            .max(1);
        return AttackResult::new(AttackOutcome::Critical, reduce(crit, defender));
    }

    let hit = base.saturating_sub(defender.defense_mitigation()).max(1);
    AttackResult::new(AttackOutcome::Hit, reduce(hit, defender))
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

fn scale(damage: u32, multiplier: f64) -> u32 {
    (f64::from(damage) * multiplier).floor() as u32
}

fn reduce(damage: u32, defender: &CombatantSnapshot) -> u32 {
    let reduction = defender.damage_reduction();
    if reduction <= 0.0 {
        return damage;
    }
    scale(damage, 1.0 - reduction).max(1)
}
