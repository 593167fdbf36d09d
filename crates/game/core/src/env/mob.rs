//! Mob definitions and the oracle that serves them.

/// Base crit/dodge/block chance for a level-1 mob.
const BASE_ABILITY_CHANCE: f64 = 0.15;
/// Chance added per level above 1.
const ABILITY_CHANCE_PER_LEVEL: f64 = 0.02;

/// Crit, dodge and block chance of a mob at `level`: `0.15 + 0.02 × (level − 1)`.
pub fn ability_chance(level: u32) -> f64 {
    BASE_ABILITY_CHANCE + ABILITY_CHANCE_PER_LEVEL * f64::from(level.saturating_sub(1))
}

/// Static catalog entry describing a mob a player can fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobDefinition {
    pub id: String,
    pub display_name: String,
    pub level: u32,
    pub max_hp: u32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub base_exp: u32,
    pub loot_copper_min: u32,
    pub loot_copper_max: u32,
}

impl MobDefinition {
    /// Builds a definition whose display name is `"<id> [<level>]"`.
    pub fn new(
        id: impl Into<String>,
        level: u32,
        max_hp: u32,
        damage: (u32, u32),
        base_exp: u32,
        loot_copper: (u32, u32),
    ) -> Self {
        let id = id.into();
        let display_name = format!("{id} [{level}]");
        Self {
            id,
            display_name,
            level,
            max_hp,
            damage_min: damage.0.min(damage.1),
            damage_max: damage.0.max(damage.1),
            base_exp,
            loot_copper_min: loot_copper.0.min(loot_copper.1),
            loot_copper_max: loot_copper.0.max(loot_copper.1),
        }
    }

    pub fn crit_chance(&self) -> f64 {
        ability_chance(self.level)
    }

    pub fn dodge_chance(&self) -> f64 {
        ability_chance(self.level)
    }

    pub fn block_chance(&self) -> f64 {
        ability_chance(self.level)
    }
}

/// Read access to the mob catalog and the region table.
pub trait MobOracle: Send + Sync {
    /// Looks up a mob by catalog id.
    fn mob(&self, id: &str) -> Option<MobDefinition>;

    /// Mobs spawned in `region`, in catalog order. Unknown regions yield nothing.
    fn mobs_in_region(&self, region: &str) -> Vec<MobDefinition>;
}
