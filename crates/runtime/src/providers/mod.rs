//! Stat provider implementations.

pub mod memory;

pub use memory::InMemoryStatProvider;
