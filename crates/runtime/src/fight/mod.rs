//! Fight orchestration: registry, per-fight instances and turn timers.
//!
//! [`service::FightService`] is the single place that mutates fights. Every
//! mutation, whether it comes from a client message or a timer, takes the
//! instance's mutex and re-checks the state machine's guards under it.
pub mod connection;
pub mod rng;

pub(crate) mod instance;
pub(crate) mod registry;
pub(crate) mod scheduler;
pub(crate) mod service;

pub use connection::{Connection, ConnectionId};
pub use rng::{RngSource, StdCombatRng};
