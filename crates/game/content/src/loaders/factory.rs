//! Content factory for building the world from data files.

use std::path::{Path, PathBuf};

use game_core::{CombatConfig, MobDefinition};

use crate::builtin::{builtin_mobs, builtin_regions};
use crate::loaders::{ConfigLoader, LoadResult, MobLoader, RegionLoader};

/// Everything the runtime needs from content: catalog, spawn table and tuning.
#[derive(Debug, Clone)]
pub struct WorldContent {
    pub mobs: Vec<MobDefinition>,
    pub regions: Vec<(String, Vec<String>)>,
    pub combat: CombatConfig,
}

impl WorldContent {
    /// The compiled-in world with default tuning.
    pub fn builtin() -> Self {
        Self {
            mobs: builtin_mobs(),
            regions: builtin_regions(),
            combat: CombatConfig::default(),
        }
    }

    /// Checks that every region references a catalog mob.
    pub fn validate(&self) -> LoadResult<()> {
        for (region, ids) in &self.regions {
            for id in ids {
                if !self.mobs.iter().any(|mob| &mob.id == id) {
                    anyhow::bail!("Region {:?} references unknown mob {:?}", region, id);
                }
            }
        }
        Ok(())
    }
}

/// Content factory that loads all world content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml   (optional, defaults apply)
/// ├── mobs.ron
/// └── regions.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `combat.toml`, or defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the mob catalog from `mobs.ron`.
    pub fn load_mobs(&self) -> LoadResult<Vec<MobDefinition>> {
        MobLoader::load(&self.data_dir.join("mobs.ron"))
    }

    /// Load the region table from `regions.ron`.
    pub fn load_regions(&self) -> LoadResult<Vec<(String, Vec<String>)>> {
        RegionLoader::load(&self.data_dir.join("regions.ron"))
    }

    /// Load and cross-check all content.
    pub fn load_world(&self) -> LoadResult<WorldContent> {
        let world = WorldContent {
            mobs: self.load_mobs()?,
            regions: self.load_regions()?,
            combat: self.load_config()?,
        };
        world.validate()?;
        Ok(world)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
