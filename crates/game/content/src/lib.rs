//! Data-driven content definitions and loaders.
//!
//! This crate houses the static world content the combat runtime serves and
//! provides loaders for RON/TOML data files:
//! - Mob catalog (data-driven via RON)
//! - Region → mob spawn table (data-driven via RON)
//! - Combat tuning (data-driven via TOML)
//!
//! Content is consumed by runtime oracles and never appears in fight state.
//! The built-in world ships in [`builtin`] so the server runs without a data
//! directory.

pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use builtin::{builtin_mobs, builtin_regions};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, MobLoader, MobSpec, RegionLoader, RegionSpec,
    WorldContent,
};
