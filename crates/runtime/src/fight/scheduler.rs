//! Turn timers.
//!
//! Each ongoing fight has at most one pending timer: the player's turn
//! deadline or the mob's delayed attack. Timers hold only weak references and
//! carry the turn sequence number they were scheduled for, so a timer that
//! outlives its turn finds a newer sequence under the lock and does nothing.
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::instance::FightInstance;
use super::service::FightService;

pub(crate) fn spawn_turn_timeout(
    service: Weak<FightService>,
    instance: Weak<Mutex<FightInstance>>,
    seq: u64,
    deadline: Instant,
) -> AbortHandle {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        if let (Some(service), Some(instance)) = (service.upgrade(), instance.upgrade()) {
            service.on_turn_timeout(instance, seq).await;
        }
    })
    .abort_handle()
}

pub(crate) fn spawn_mob_attack(
    service: Weak<FightService>,
    instance: Weak<Mutex<FightInstance>>,
    seq: u64,
    delay: Duration,
) -> AbortHandle {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let (Some(service), Some(instance)) = (service.upgrade(), instance.upgrade()) {
            service.on_mob_turn(instance, seq).await;
        }
    })
    .abort_handle()
}

