//! High-level runtime orchestrator.
//!
//! The runtime wires the mob catalog, the stat provider and the event bus into
//! a fight service and exposes a builder-based API for the server to drive it.

use std::sync::Arc;

use tokio::sync::broadcast;

use game_core::{CombatConfig, CombatRng, MobOracle};

use crate::api::{RuntimeHandle, StatProvider};
use crate::events::{EventBus, FightEvent, Topic};
use crate::fight::service::FightService;
use crate::fight::{RngSource, StdCombatRng};
use crate::oracle::MobOracleImpl;
use crate::providers::InMemoryStatProvider;

/// Runtime configuration shared across the orchestrator and timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    /// Push messages buffered per connection before sends start failing.
    pub connection_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            connection_buffer_size: 64,
        }
    }
}

/// Main runtime that owns the fight service.
///
/// Design: Runtime owns shutdown; [`RuntimeHandle`] provides a cloneable
/// façade for connection handlers.
pub struct Runtime {
    handle: RuntimeHandle,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<FightEvent> {
        self.handle.subscribe(topic).await
    }

    /// Shut down, forfeiting every ongoing fight. Returns how many were forfeited.
    pub async fn shutdown(self) -> usize {
        self.handle.forfeit_all().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    mobs: Option<Arc<dyn MobOracle>>,
    stats: Option<Arc<dyn StatProvider>>,
    rng_source: Option<RngSource>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            mobs: None,
            stats: None,
            rng_source: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Mob catalog. Defaults to [`MobOracleImpl::builtin`].
    pub fn mob_oracle(mut self, oracle: impl MobOracle + 'static) -> Self {
        self.mobs = Some(Arc::new(oracle));
        self
    }

    /// Player stat storage. Defaults to an auto-registering in-memory provider.
    pub fn stat_provider(mut self, provider: Arc<dyn StatProvider>) -> Self {
        self.stats = Some(provider);
        self
    }

    /// Random source for new fights. Defaults to entropy-seeded [`StdCombatRng`].
    pub fn rng_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Box<dyn CombatRng> + Send + Sync + 'static,
    {
        self.rng_source = Some(Arc::new(source));
        self
    }

    /// Deterministic dice: fight `n` uses `StdRng` seeded with `seed + n`.
    pub fn seeded(self, seed: u64) -> Self {
        let counter = std::sync::atomic::AtomicU64::new(seed);
        self.rng_source(move || {
            let seed = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            Box::new(StdCombatRng::seeded(seed)) as Box<dyn CombatRng>
        })
    }

    pub fn build(self) -> Runtime {
        let mobs = self
            .mobs
            .unwrap_or_else(|| Arc::new(MobOracleImpl::builtin()));
        let stats = self
            .stats
            .unwrap_or_else(|| Arc::new(InMemoryStatProvider::with_auto_register()));
        let rng_source = self.rng_source.unwrap_or_else(StdCombatRng::source);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        tracing::info!(
            turn_timeout_secs = self.config.combat.turn_timeout_secs,
            mob_delay_min_secs = self.config.combat.mob_delay_min_secs,
            mob_delay_max_secs = self.config.combat.mob_delay_max_secs,
            "runtime initialized"
        );

        let service = FightService::new(
            self.config.combat,
            self.config.connection_buffer_size,
            mobs,
            stats,
            event_bus,
            rng_source,
        );

        Runtime {
            handle: RuntimeHandle::new(Arc::new(service)),
        }
    }
}
