//! Attack zones selectable by the player.

use std::str::FromStr;

use crate::error::FightError;

/// Where the player aims an attack.
///
/// `Plain` is never selectable by the client: only the turn-timeout path
/// produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackType {
    /// ×1.20 damage, mob dodge chance +10%.
    Head,
    /// ×1.00 damage.
    Chest,
    /// ×0.85 damage, mob dodge chance −5%.
    Legs,
    /// ×0.50 damage, automatic attack on timeout.
    Plain,
}

impl AttackType {
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Self::Head => 1.20,
            Self::Chest => 1.00,
            Self::Legs => 0.85,
            Self::Plain => 0.50,
        }
    }

    /// Adjustment added to the defender's dodge chance.
    pub const fn evade_modifier(self) -> f64 {
        match self {
            Self::Head => 0.10,
            Self::Legs => -0.05,
            Self::Chest | Self::Plain => 0.0,
        }
    }

    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Parses a client-supplied zone. Only `head`, `chest` and `legs` are
    /// accepted (case-insensitive).
    pub fn parse_selectable(input: &str) -> Result<Self, FightError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "head" => Ok(Self::Head),
            "chest" => Ok(Self::Chest),
            "legs" => Ok(Self::Legs),
            _ => Err(FightError::InvalidAttackType(input.to_string())),
        }
    }
}

impl FromStr for AttackType {
    type Err = FightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_selectable(s)
    }
}
