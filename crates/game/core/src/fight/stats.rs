/// Running damage totals for one fight.
///
/// `player_damage_dealt` always equals `mob_damage_taken` (and vice versa);
/// both sides are kept so each combatant's perspective reads directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightStats {
    pub player_damage_dealt: u32,
    pub player_damage_taken: u32,
    pub mob_damage_dealt: u32,
    pub mob_damage_taken: u32,
    /// Attacks resolved, including dodged ones and automatic attacks.
    pub turns: u32,
}

impl FightStats {
    pub(crate) fn record_player_hit(&mut self, damage: u32) {
        self.player_damage_dealt = self.player_damage_dealt.saturating_add(damage);
        self.mob_damage_taken = self.mob_damage_taken.saturating_add(damage);
        self.turns += 1;
    }

    pub(crate) fn record_mob_hit(&mut self, damage: u32) {
        self.mob_damage_dealt = self.mob_damage_dealt.saturating_add(damage);
        self.player_damage_taken = self.player_damage_taken.saturating_add(damage);
        self.turns += 1;
    }
}
