//! Mob catalog and region table implementing [`game_core::MobOracle`].
use std::collections::HashMap;

use game_content::WorldContent;
use game_core::{MobDefinition, MobOracle};

/// MobOracle implementation backed by an in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct MobOracleImpl {
    mobs: HashMap<String, MobDefinition>,
    regions: HashMap<String, Vec<String>>,
}

impl MobOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a catalog entry
    pub fn add_mob(&mut self, mob: MobDefinition) {
        self.mobs.insert(mob.id.clone(), mob);
    }

    /// Add or replace a region's spawn list
    pub fn add_region(&mut self, region: impl Into<String>, mob_ids: Vec<String>) {
        self.regions.insert(region.into(), mob_ids);
    }

    /// Build from loaded content
    pub fn from_content(content: &WorldContent) -> Self {
        let mut oracle = Self::new();
        for mob in &content.mobs {
            oracle.add_mob(mob.clone());
        }
        for (region, mob_ids) in &content.regions {
            oracle.add_region(region.clone(), mob_ids.clone());
        }
        oracle
    }

    /// Create with the compiled-in world
    pub fn builtin() -> Self {
        Self::from_content(&WorldContent::builtin())
    }
}

impl MobOracle for MobOracleImpl {
    fn mob(&self, id: &str) -> Option<MobDefinition> {
        self.mobs.get(id).cloned()
    }

    fn mobs_in_region(&self, region: &str) -> Vec<MobDefinition> {
        self.regions
            .get(region)
            .map(|ids| ids.iter().filter_map(|id| self.mob(id)).collect())
            .unwrap_or_default()
    }
}
