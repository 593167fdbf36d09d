//! Combat tuning loader.

use std::path::Path;

use game_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load combat config from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.mob_delay_min_secs > config.mob_delay_max_secs {
            anyhow::bail!(
                "mob_delay_min_secs ({}) exceeds mob_delay_max_secs ({})",
                config.mob_delay_min_secs,
                config.mob_delay_max_secs
            );
        }
        if config.turn_timeout_secs == 0 {
            anyhow::bail!("turn_timeout_secs must be positive");
        }

        Ok(config)
    }
}
