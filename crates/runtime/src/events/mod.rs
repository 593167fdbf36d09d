//! Topic-based event bus for runtime events.
//!
//! Fight lifecycle and per-attack events are published to separate topics so
//! consumers subscribe only to what they need.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::FightEvent;
