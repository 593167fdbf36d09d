//! Fight orchestration shared by the runtime handle and the turn timers.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use game_core::{
    AttackType, CombatConfig, FightError, FightOutcome, FightState, MobDefinition, MobOracle,
    TurnReport,
};

use crate::api::{
    ActiveFight, FightSettlement, FightView, PushMessage, Result, RuntimeError, StatProvider,
};
use crate::events::{EventBus, FightEvent};

use super::connection::{Connection, ConnectionId};
use super::instance::FightInstance;
use super::registry::{FightRegistry, SharedInstance};
use super::rng::RngSource;
use super::scheduler;

const LEFT_MESSAGE: &str = "You left the battle.";

pub(crate) struct FightService {
    combat: CombatConfig,
    connection_buffer: usize,
    registry: FightRegistry,
    mobs: Arc<dyn MobOracle>,
    stats: Arc<dyn StatProvider>,
    event_bus: EventBus,
    rng_source: RngSource,
    next_connection_id: AtomicU64,
}

impl FightService {
    pub fn new(
        combat: CombatConfig,
        connection_buffer: usize,
        mobs: Arc<dyn MobOracle>,
        stats: Arc<dyn StatProvider>,
        event_bus: EventBus,
        rng_source: RngSource,
    ) -> Self {
        Self {
            combat,
            connection_buffer: connection_buffer.max(1),
            registry: FightRegistry::new(),
            mobs,
            stats,
            event_bus,
            rng_source,
            next_connection_id: AtomicU64::new(1),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn region_mobs(&self, region: &str) -> Vec<MobDefinition> {
        self.mobs.mobs_in_region(region)
    }

    pub fn open_connection(&self) -> (Connection, mpsc::Receiver<PushMessage>) {
        let id = ConnectionId(self.next_connection_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.connection_buffer);
        (Connection::new(id, tx), rx)
    }

    pub async fn start_fight(
        self: &Arc<Self>,
        player_id: &str,
        mob_id: &str,
        connection: Option<Connection>,
    ) -> Result<FightView> {
        let mob = self
            .mobs
            .mob(mob_id)
            .ok_or_else(|| RuntimeError::UnknownMob(mob_id.to_string()))?;

        // A finished fight the player never acknowledged is replaced.
        let previous = self.registry.find(player_id).await;
        if let Some(existing) = &previous
            && !existing.lock().await.state.is_over()
        {
            return Err(already_fighting(player_id));
        }

        let profile = self.stats.load_profile(player_id).await?;
        let state = FightState::new(
            profile.snapshot,
            mob,
            profile.current_hp,
            profile.experience,
        );
        let instance: SharedInstance = Arc::new(Mutex::new(FightInstance::new(
            player_id,
            state,
            (self.rng_source)(),
        )));

        let mut fight = instance.lock().await;
        if !self
            .registry
            .begin(player_id, Arc::clone(&instance), previous.as_ref())
            .await
        {
            return Err(already_fighting(player_id));
        }

        if let Some(connection) = connection {
            fight.attach(connection);
        }
        let (seq, deadline) = fight.begin_player_turn(self.combat.turn_timeout());
        fight.set_timer(scheduler::spawn_turn_timeout(
            Arc::downgrade(self),
            Arc::downgrade(&instance),
            seq,
            deadline,
        ));

        let view = fight.view();
        let log = fight.state.log().entries().to_vec();
        fight.push(PushMessage::FightStarted {
            state: view.clone(),
            log,
        });
        let update = fight.turn_update();
        fight.push(update);
        drop(fight);

        info!(
            target: "runtime::fight",
            player = player_id,
            mob = mob_id,
            player_hp = view.player_hp,
            "fight started"
        );
        self.event_bus.publish(FightEvent::Started {
            player_id: player_id.to_string(),
            mob_id: mob_id.to_string(),
        });
        Ok(view)
    }

    pub async fn attack(self: &Arc<Self>, player_id: &str, attack_type: &str) -> Result<()> {
        let attack = AttackType::parse_selectable(attack_type)?;
        let instance = self.active_instance(player_id).await?;

        let settlement = {
            let mut fight = instance.lock().await;
            // The timeout is authoritative once the deadline has passed, even
            // if its task has not taken the lock yet.
            if fight.deadline_elapsed(Instant::now()) {
                debug!(target: "runtime::fight", player = player_id, "attack after deadline");
                return Err(FightError::NotYourTurn.into());
            }
            let report = fight.player_attack(attack)?;
            self.after_player_attack(&instance, &mut fight, report)
        };

        self.settle(settlement).await;
        Ok(())
    }

    pub async fn leave(&self, player_id: &str) -> Result<()> {
        let instance = self.active_instance(player_id).await?;
        {
            let mut fight = instance.lock().await;
            if !fight.state.is_over() {
                return Err(RuntimeError::FightActive);
            }
            fight.push(PushMessage::FightLeft {
                message: LEFT_MESSAGE.to_string(),
            });
        }

        if self.registry.end(player_id, &instance).await {
            info!(target: "runtime::fight", player = player_id, "fight removed");
            self.event_bus.publish(FightEvent::Removed {
                player_id: player_id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn rejoin(&self, player_id: &str, connection: Connection) -> Result<ActiveFight> {
        let instance = self.active_instance(player_id).await?;
        let mut fight = instance.lock().await;

        let connection_id = connection.id();
        if let Some(previous) = fight.attach(connection)
            && previous.id() != connection_id
        {
            debug!(
                target: "runtime::fight",
                player = player_id,
                previous = %previous.id(),
                "replacing attached connection"
            );
        }

        let active = fight.active();
        fight.push(PushMessage::FightRejoined {
            state: active.state.clone(),
            log_history: active.log_history.clone(),
        });
        match fight.state.outcome().cloned() {
            Some(outcome) => {
                let over = fight.fight_over(&outcome);
                fight.push(over);
            }
            None => {
                let update = fight.turn_update();
                fight.push(update);
            }
        }

        info!(
            target: "runtime::fight",
            player = player_id,
            connection = %connection_id,
            entries = active.log_history.len(),
            "fight rejoined"
        );
        Ok(active)
    }

    pub async fn disconnect(&self, player_id: &str, connection_id: ConnectionId) -> bool {
        let Some(instance) = self.registry.find(player_id).await else {
            return false;
        };
        let detached = instance.lock().await.detach(connection_id);
        if detached {
            debug!(
                target: "runtime::fight",
                player = player_id,
                connection = %connection_id,
                "connection detached"
            );
        }
        detached
    }

    /// The player's ongoing fight. Finished fights awaiting `leave` are not
    /// reported; `rejoin` still replays them.
    pub async fn active_fight(&self, player_id: &str) -> Option<ActiveFight> {
        let instance = self.registry.find(player_id).await?;
        let fight = instance.lock().await;
        if fight.state.is_over() {
            return None;
        }
        Some(fight.active())
    }

    pub async fn fight_count(&self) -> usize {
        self.registry.len().await
    }

    /// Ends every ongoing fight in defeat. Returns how many were forfeited.
    pub async fn forfeit_all(&self) -> usize {
        let mut settlements = Vec::new();
        for instance in self.registry.all().await {
            let mut fight = instance.lock().await;
            if let Some(outcome) = fight.state.forfeit() {
                fight.push_log(std::slice::from_ref(&outcome.message));
                settlements.push(self.finish(&mut fight, outcome));
            }
        }

        let count = settlements.len();
        for settlement in settlements {
            self.settle(Some(settlement)).await;
        }
        if count > 0 {
            info!(target: "runtime::fight", count, "forfeited ongoing fights");
        }
        count
    }

    pub(crate) async fn on_turn_timeout(self: Arc<Self>, instance: SharedInstance, seq: u64) {
        let settlement = {
            let mut fight = instance.lock().await;
            if !fight.is_current(seq) {
                debug!(target: "runtime::fight", player = fight.player_id(), seq, "stale turn timer");
                return;
            }
            fight.release_timer();
            let report = match fight.auto_attack() {
                Ok(report) => report,
                Err(err) => {
                    debug!(target: "runtime::fight", player = fight.player_id(), %err, "auto attack rejected");
                    return;
                }
            };
            info!(
                target: "runtime::fight",
                player = fight.player_id(),
                "turn timed out, plain attack applied"
            );
            self.after_player_attack(&instance, &mut fight, report)
        };
        self.settle(settlement).await;
    }

    pub(crate) async fn on_mob_turn(self: Arc<Self>, instance: SharedInstance, seq: u64) {
        let settlement = {
            let mut fight = instance.lock().await;
            if !fight.is_current(seq) {
                debug!(target: "runtime::fight", player = fight.player_id(), seq, "stale mob timer");
                return;
            }
            fight.release_timer();
            let report = match fight.mob_attack() {
                Ok(report) => report,
                Err(err) => {
                    debug!(target: "runtime::fight", player = fight.player_id(), %err, "mob attack rejected");
                    return;
                }
            };

            self.publish_attack(fight.player_id(), &report);
            fight.push_log(&report.log_entries);
            match report.finished {
                Some(outcome) => Some(self.finish(&mut fight, outcome)),
                None => {
                    let (seq, deadline) = fight.begin_player_turn(self.combat.turn_timeout());
                    fight.set_timer(scheduler::spawn_turn_timeout(
                        Arc::downgrade(&self),
                        Arc::downgrade(&instance),
                        seq,
                        deadline,
                    ));
                    let update = fight.turn_update();
                    fight.push(update);
                    debug!(target: "runtime::fight", player = fight.player_id(), seq, "player turn");
                    None
                }
            }
        };
        self.settle(settlement).await;
    }

    /// Shared tail of a chosen or automatic player attack. Runs under the
    /// instance lock; the returned settlement must be recorded after release.
    fn after_player_attack(
        self: &Arc<Self>,
        instance: &SharedInstance,
        fight: &mut FightInstance,
        report: TurnReport,
    ) -> Option<FightSettlement> {
        self.publish_attack(fight.player_id(), &report);
        fight.push_log(&report.log_entries);

        match report.finished {
            Some(outcome) => Some(self.finish(fight, outcome)),
            None => {
                let delay = fight.mob_delay(&self.combat);
                let seq = fight.begin_mob_turn();
                fight.set_timer(scheduler::spawn_mob_attack(
                    Arc::downgrade(self),
                    Arc::downgrade(instance),
                    seq,
                    delay,
                ));
                let update = fight.turn_update();
                fight.push(update);
                debug!(
                    target: "runtime::fight",
                    player = fight.player_id(),
                    seq,
                    delay_secs = delay.as_secs(),
                    "mob turn"
                );
                None
            }
        }
    }

    fn finish(&self, fight: &mut FightInstance, outcome: FightOutcome) -> FightSettlement {
        fight.end();
        let over = fight.fight_over(&outcome);
        fight.push(over);

        let settlement = fight.settlement(&outcome);
        info!(
            target: "runtime::fight",
            player = fight.player_id(),
            mob = %settlement.mob_id,
            result = %outcome.status,
            turns = settlement.stats.turns,
            "fight finished"
        );
        self.event_bus.publish(FightEvent::Finished {
            player_id: settlement.player_id.clone(),
            mob_id: settlement.mob_id.clone(),
            result: outcome.status,
            reward: outcome.reward,
        });
        settlement
    }

    async fn settle(&self, settlement: Option<FightSettlement>) {
        let Some(settlement) = settlement else {
            return;
        };
        if let Err(err) = self.stats.record_settlement(&settlement).await {
            warn!(
                target: "runtime::fight",
                player = %settlement.player_id,
                %err,
                "failed to record fight settlement"
            );
        }
    }

    fn publish_attack(&self, player_id: &str, report: &TurnReport) {
        self.event_bus.publish(FightEvent::AttackResolved {
            player_id: player_id.to_string(),
            attacker: report.attacker,
            outcome: report.result.outcome,
            damage: report.result.damage,
            automatic: report.automatic,
        });
    }

    async fn active_instance(&self, player_id: &str) -> Result<SharedInstance> {
        self.registry
            .find(player_id)
            .await
            .ok_or(RuntimeError::NoActiveFight)
    }
}

fn already_fighting(player_id: &str) -> RuntimeError {
    RuntimeError::AlreadyFighting {
        player_id: player_id.to_string(),
    }
}
