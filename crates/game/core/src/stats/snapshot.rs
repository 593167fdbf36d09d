/// Derived combat stats of a player, captured when the fight starts.
///
/// Chances are fractions in `[0, 1]`. `damage_reduction_pct` is expressed in
/// percentage points (`5.0` means 5%).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub identity: String,
    pub nickname: String,
    pub level: u32,
    pub max_hp: u32,
    pub max_mana: u32,
    pub strength: u32,
    pub weapon_damage: u32,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub block_chance: f64,
    pub defense: u32,
    pub damage_reduction_pct: f64,
}

impl CombatantSnapshot {
    /// Unarmed level-1 character with 100 HP and no avoidance.
    pub fn novice(identity: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            nickname: nickname.into(),
            level: 1,
            max_hp: 100,
            max_mana: 50,
            strength: 10,
            weapon_damage: 5,
            crit_chance: 0.05,
            dodge_chance: 0.05,
            block_chance: 0.05,
            defense: 0,
            damage_reduction_pct: 0.0,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    /// Fraction of incoming damage removed by damage reduction, clamped to `[0, 1]`.
    pub fn damage_reduction(&self) -> f64 {
        (self.damage_reduction_pct / 100.0).clamp(0.0, 1.0)
    }

    /// Flat mitigation applied to mob hits: `defense / 4`.
    pub fn defense_mitigation(&self) -> u32 {
        self.defense / 4
    }
}
