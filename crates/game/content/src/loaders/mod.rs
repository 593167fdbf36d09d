//! Content loaders for reading world data from files.
//!
//! This module provides loaders that convert RON/TOML files into the values
//! the runtime's mob oracle and combat config are built from.

pub mod config;
pub mod factory;
pub mod mobs;
pub mod regions;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, WorldContent};
pub use mobs::{MobLoader, MobSpec};
pub use regions::{RegionLoader, RegionSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
