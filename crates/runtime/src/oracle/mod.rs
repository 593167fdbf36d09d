//! Runtime wrappers around static world content.
//!
//! The data is immutable at runtime; dynamic state lives in fight instances
//! and the stat provider.
mod mobs;

pub use mobs::MobOracleImpl;
