//! Mob catalog loader.

use std::path::Path;

use game_core::MobDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One catalog entry as written in RON. The display name is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobSpec {
    pub name: String,
    pub level: u32,
    pub max_hp: u32,
    pub damage: (u32, u32),
    pub base_exp: u32,
    pub loot_copper: (u32, u32),
}

impl From<MobSpec> for MobDefinition {
    fn from(spec: MobSpec) -> Self {
        MobDefinition::new(
            spec.name,
            spec.level,
            spec.max_hp,
            spec.damage,
            spec.base_exp,
            spec.loot_copper,
        )
    }
}

/// Mob catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobCatalog {
    pub mobs: Vec<MobSpec>,
}

/// Loader for the mob catalog from RON files.
pub struct MobLoader;

impl MobLoader {
    /// Load the mob catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<MobDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MobDefinition>> {
        let catalog: MobCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse mob catalog RON: {}", e))?;

        let mut mobs: Vec<MobDefinition> = Vec::with_capacity(catalog.mobs.len());
        for spec in catalog.mobs {
            if spec.level == 0 || spec.max_hp == 0 {
                anyhow::bail!("Mob {:?} must have a positive level and max_hp", spec.name);
            }
            if mobs.iter().any(|m| m.id == spec.name) {
                anyhow::bail!("Duplicate mob {:?} in catalog", spec.name);
            }
            mobs.push(spec.into());
        }

        Ok(mobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"(
        mobs: [
            (name: "Krets", level: 1, max_hp: 55, damage: (2, 6), base_exp: 5, loot_copper: (40, 112)),
            (name: "Skeleton", level: 3, max_hp: 90, damage: (6, 10), base_exp: 25, loot_copper: (300, 700)),
        ],
    )"#;

    #[test]
    fn parses_catalog() {
        let mobs = MobLoader::parse(CATALOG).unwrap();
        assert_eq!(mobs.len(), 2);
        assert_eq!(mobs[0].display_name, "Krets [1]");
        assert_eq!(mobs[1].damage_max, 10);
    }

    #[test]
    fn rejects_duplicates() {
        let dup = r#"(mobs: [
            (name: "Krets", level: 1, max_hp: 55, damage: (2, 6), base_exp: 5, loot_copper: (40, 112)),
            (name: "Krets", level: 2, max_hp: 55, damage: (2, 6), base_exp: 5, loot_copper: (40, 112)),
        ])"#;
        assert!(MobLoader::parse(dup).is_err());
    }
}
