//! Fight state machine.
//!
//! A fight starts `Ongoing` with the player to act and ends in exactly one of
//! the terminal states. Every mutation goes through a guarded method that
//! re-checks status and turn ownership, so callers may race freely as long as
//! they serialize access to the state itself.

use crate::combat::{
    AttackOutcome, AttackResult, AttackType, apply_damage, resolve_mob_attack,
    resolve_player_attack,
};
use crate::env::{CombatRng, MobDefinition};
use crate::error::FightError;
use crate::reward::{Reward, calculate_reward, format_copper};
use crate::stats::CombatantSnapshot;

use super::{FightLog, FightStats};

const AUTO_PREFIX: &str = "[Auto] ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnOwner {
    Player,
    Mob,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightStatus {
    Ongoing,
    Victory,
    Defeat,
}

impl FightStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// How a fight ended. Produced exactly once, on the terminal transition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightOutcome {
    pub status: FightStatus,
    pub message: String,
    /// Present only on victory.
    pub reward: Option<Reward>,
}

/// Everything one resolved attack produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub attacker: TurnOwner,
    /// `None` for mob attacks.
    pub attack_type: Option<AttackType>,
    pub automatic: bool,
    pub result: AttackResult,
    /// Log entries appended by this attack, in order (including the terminal message).
    pub log_entries: Vec<String>,
    /// Set when this attack ended the fight.
    pub finished: Option<FightOutcome>,
}

/// State of one player-versus-mob fight.
#[derive(Clone, Debug)]
pub struct FightState {
    player: CombatantSnapshot,
    mob: MobDefinition,
    player_hp: u32,
    player_mana: u32,
    mob_hp: u32,
    player_experience: u64,
    turn_owner: TurnOwner,
    status: FightStatus,
    log: FightLog,
    stats: FightStats,
    outcome: Option<FightOutcome>,
}

impl FightState {
    /// Starts a fight with the player to act.
    ///
    /// `player_hp` is the persisted HP, clamped to `[1, max_hp]`. Mana starts full.
    pub fn new(
        player: CombatantSnapshot,
        mob: MobDefinition,
        player_hp: u32,
        player_experience: u64,
    ) -> Self {
        let max_hp = player.max_hp.max(1);
        let mut log = FightLog::new();
        log.push(format!(
            "Battle begins! {} vs {}!",
            player.nickname, mob.display_name
        ));

        Self {
            player_hp: player_hp.clamp(1, max_hp),
            player_mana: player.max_mana,
            mob_hp: mob.max_hp,
            player_experience,
            turn_owner: TurnOwner::Player,
            status: FightStatus::Ongoing,
            log,
            stats: FightStats::default(),
            outcome: None,
            player,
            mob,
        }
    }

    /// Player-chosen attack. `Plain` is reserved for the timeout path.
    pub fn player_attack(
        &mut self,
        attack: AttackType,
        rng: &mut (impl CombatRng + ?Sized),
    ) -> Result<TurnReport, FightError> {
        self.ensure_turn(TurnOwner::Player)?;
        if !attack.is_selectable() {
            return Err(FightError::InvalidAttackType(attack.to_string()));
        }
        Ok(self.resolve_player(attack, false, rng))
    }

    /// Automatic `Plain` attack applied when the player's turn times out.
    pub fn auto_attack(
        &mut self,
        rng: &mut (impl CombatRng + ?Sized),
    ) -> Result<TurnReport, FightError> {
        self.ensure_turn(TurnOwner::Player)?;
        Ok(self.resolve_player(AttackType::Plain, true, rng))
    }

    /// Mob's attack, fired after the mob-turn delay.
    pub fn mob_attack(
        &mut self,
        rng: &mut (impl CombatRng + ?Sized),
    ) -> Result<TurnReport, FightError> {
        self.ensure_turn(TurnOwner::Mob)?;

        let result = resolve_mob_attack(&self.mob, &self.player, rng);
        self.player_hp = apply_damage(self.player_hp, result.damage);
        self.stats.record_mob_hit(result.damage);

        let mark = self.log.len();
        self.log.push(describe(
            &result,
            &self.mob.display_name,
            &self.player.nickname,
            false,
        ));

        let finished = if self.player_hp == 0 {
            Some(self.finish(FightStatus::Defeat, None))
        } else {
            self.turn_owner = TurnOwner::Player;
            None
        };

        self.check_invariants();
        Ok(TurnReport {
            attacker: TurnOwner::Mob,
            attack_type: None,
            automatic: false,
            result,
            log_entries: self.log.since(mark).to_vec(),
            finished,
        })
    }

    /// Ends an ongoing fight in defeat without a reward.
    ///
    /// Returns `None` when the fight was already over.
    pub fn forfeit(&mut self) -> Option<FightOutcome> {
        if self.status.is_terminal() {
            return None;
        }
        Some(self.finish(FightStatus::Defeat, None))
    }

    pub fn player(&self) -> &CombatantSnapshot {
        &self.player
    }

    pub fn mob(&self) -> &MobDefinition {
        &self.mob
    }

    pub fn player_hp(&self) -> u32 {
        self.player_hp
    }

    pub fn player_mana(&self) -> u32 {
        self.player_mana
    }

    pub fn mob_hp(&self) -> u32 {
        self.mob_hp
    }

    pub fn turn_owner(&self) -> TurnOwner {
        self.turn_owner
    }

    pub fn status(&self) -> FightStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn log(&self) -> &FightLog {
        &self.log
    }

    pub fn stats(&self) -> &FightStats {
        &self.stats
    }

    pub fn outcome(&self) -> Option<&FightOutcome> {
        self.outcome.as_ref()
    }

    fn ensure_turn(&self, owner: TurnOwner) -> Result<(), FightError> {
        if self.status.is_terminal() {
            return Err(FightError::FightOver(self.status));
        }
        if self.turn_owner != owner {
            return Err(FightError::NotYourTurn);
        }
        Ok(())
    }

    fn resolve_player(
        &mut self,
        attack: AttackType,
        automatic: bool,
        rng: &mut (impl CombatRng + ?Sized),
    ) -> TurnReport {
        let result = resolve_player_attack(&self.player, &self.mob, attack, rng);
        self.mob_hp = apply_damage(self.mob_hp, result.damage);
        self.stats.record_player_hit(result.damage);

        let mark = self.log.len();
        self.log.push(describe(
            &result,
            &self.player.nickname,
            &self.mob.display_name,
            automatic,
        ));

        let finished = if self.mob_hp == 0 {
            let reward = calculate_reward(
                self.player.level,
                self.player_experience,
                &self.mob,
                rng,
            );
            Some(self.finish(FightStatus::Victory, Some(reward)))
        } else {
            self.turn_owner = TurnOwner::Mob;
            None
        };

        self.check_invariants();
        TurnReport {
            attacker: TurnOwner::Player,
            attack_type: Some(attack),
            automatic,
            result,
            log_entries: self.log.since(mark).to_vec(),
            finished,
        }
    }

    fn finish(&mut self, status: FightStatus, reward: Option<Reward>) -> FightOutcome {
        debug_assert!(status.is_terminal());
        debug_assert!(self.outcome.is_none(), "fight finished twice");

        let message = match status {
            FightStatus::Victory => {
                let mut message = format!("Victorious! You defeated {}!", self.mob.display_name);
                if let Some(loot) = reward.map(|r| r.loot_copper).filter(|loot| *loot > 0) {
                    message.push_str(&format!(" Loot: {}", format_copper(u64::from(loot))));
                }
                message
            }
            _ => format!("Defeat! You were slain by {}!", self.mob.display_name),
        };

        self.status = status;
        self.log.push(message.clone());
        let outcome = FightOutcome {
            status,
            message,
            reward,
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn check_invariants(&self) {
        debug_assert!(self.player_hp <= self.player.max_hp.max(1));
        debug_assert!(self.mob_hp <= self.mob.max_hp);
        debug_assert_eq!(self.status.is_terminal(), self.outcome.is_some());
    }
}

fn describe(result: &AttackResult, attacker: &str, defender: &str, automatic: bool) -> String {
    let text = match result.outcome {
        AttackOutcome::Dodge => format!("{defender} dodged the attack!"),
        AttackOutcome::Block => format!("{defender} blocked! Reduced damage: {}", result.damage),
        AttackOutcome::Critical => {
            format!("CRITICAL HIT! {attacker} deals {} damage to {defender}!", result.damage)
        }
        AttackOutcome::Hit => format!("{attacker} deals {} damage to {defender}.", result.damage),
    };
    if automatic {
        format!("{AUTO_PREFIX}{text}")
    } else {
        text
    }
}
