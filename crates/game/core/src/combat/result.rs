//! Combat result types.

/// Which branch of the resolution pipeline applied. First match wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackOutcome {
    /// Defender evaded, no damage.
    Dodge,
    /// Defender blocked, damage halved.
    Block,
    /// Critical hit, damage ×1.5.
    Critical,
    /// Regular hit.
    Hit,
}

/// Result of resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// Damage to subtract from the defender's HP (0 on dodge).
    pub damage: u32,
}

impl AttackResult {
    pub const fn dodged() -> Self {
        Self {
            outcome: AttackOutcome::Dodge,
            damage: 0,
        }
    }

    pub const fn new(outcome: AttackOutcome, damage: u32) -> Self {
        Self { outcome, damage }
    }
}
