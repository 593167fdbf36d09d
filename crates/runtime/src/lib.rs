//! Runtime orchestration for turn-based player-versus-mob fights.
//!
//! This crate wires the `game-core` state machine to tokio: a registry of live
//! fights, per-fight turn timers, connection attach/detach and settlement
//! write-back through a [`StatProvider`]. Consumers embed [`Runtime`] and
//! drive fights through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`fight`] holds connections, randomness and the crate-private fight service
//! - [`oracle`] and [`providers`] provide data adapters reused by the server
pub mod api;
pub mod events;
pub mod fight;
pub mod oracle;
pub mod providers;
pub mod runtime;

pub use api::{
    ActiveFight, FightSettlement, FightView, PlayerProfile, ProviderError, PushMessage, Result,
    RuntimeError, RuntimeHandle, StatProvider,
};
pub use events::{EventBus, FightEvent, Topic};
pub use fight::{Connection, ConnectionId, RngSource, StdCombatRng};
pub use oracle::MobOracleImpl;
pub use providers::InMemoryStatProvider;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
