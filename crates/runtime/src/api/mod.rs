//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the fight orchestration internals can stay crate-private.

pub mod errors;
pub mod handle;
pub mod messages;
pub mod providers;

pub use errors::{ProviderError, Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use messages::{ActiveFight, FightView, PushMessage};
pub use providers::{FightSettlement, PlayerProfile, StatProvider};
