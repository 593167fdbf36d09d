//! Fight lifecycle on virtual time.
//!
//! Scripted dice: every roll is 0.99 (a plain hit), every range draw takes its
//! minimum (mob hits for 2, mob waits 1 s, Krets drops 40 copper) and the
//! damage spread is exactly 1.0. The hero hits Krets for 19 with a chosen
//! chest attack and 9 with the automatic plain attack.

use std::sync::Arc;
use std::time::Duration;

use game_core::testing::ScriptedRng;
use game_core::{CombatRng, CombatantSnapshot, FightError, FightStatus, TurnOwner};
use runtime::{
    FightEvent, InMemoryStatProvider, PlayerProfile, ProviderError, PushMessage, Runtime,
    RuntimeError, Topic,
};
use tokio::sync::mpsc;
use tokio::time::sleep;

const HERO: &str = "hero@example.com";

fn hero_profile(current_hp: u32) -> PlayerProfile {
    PlayerProfile {
        snapshot: CombatantSnapshot {
            strength: 20,
            weapon_damage: 15,
            ..CombatantSnapshot::novice(HERO, "Hero")
        },
        current_hp,
        experience: 0,
        copper: 0,
    }
}

fn provider_with_hero(current_hp: u32) -> Arc<InMemoryStatProvider> {
    Arc::new(InMemoryStatProvider::new().with_player(HERO, hero_profile(current_hp)))
}

fn scripted_runtime(provider: Arc<InMemoryStatProvider>) -> Runtime {
    Runtime::builder()
        .stat_provider(provider)
        .rng_source(|| Box::new(ScriptedRng::new()) as Box<dyn CombatRng>)
        .build()
}

fn drain(rx: &mut mpsc::Receiver<PushMessage>) -> Vec<PushMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

fn log_texts(messages: &[PushMessage]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|message| match message {
            PushMessage::FightLog { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn start_pushes_state_and_player_deadline() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    let (connection, mut rx) = handle.open_connection();

    let view = handle
        .start_fight(HERO, "Krets", Some(connection))
        .await
        .expect("fight starts");
    assert_eq!(view.turn_owner, TurnOwner::Player);
    assert_eq!(view.status, FightStatus::Ongoing);
    assert_eq!(view.mob_name, "Krets [1]");
    assert_eq!(view.mob_hp, 55);
    assert!(view.deadline.is_some());

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 2);
    match &messages[0] {
        PushMessage::FightStarted { log, .. } => {
            assert_eq!(log, &["Battle begins! Hero vs Krets [1]!"]);
        }
        other => panic!("expected fight_started, got {other:?}"),
    }
    match &messages[1] {
        PushMessage::TurnUpdate {
            turn_owner,
            deadline,
            remaining_ms,
        } => {
            assert_eq!(*turn_owner, TurnOwner::Player);
            assert!(deadline.is_some());
            assert_eq!(*remaining_ms, Some(10_000));
        }
        other => panic!("expected turn_update, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn second_start_while_ongoing_is_rejected() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();

    handle.start_fight(HERO, "Krets", None).await.unwrap();
    let err = handle.start_fight(HERO, "Skeleton", None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::AlreadyFighting { .. }));
    assert_eq!(err.code(), "already_fighting");
    assert_eq!(handle.fight_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_mob_and_unknown_player_are_rejected() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();

    let err = handle.start_fight(HERO, "Dragon", None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownMob(ref id) if id == "Dragon"));

    let err = handle
        .start_fight("ghost@example.com", "Krets", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Provider(ProviderError::PlayerNotFound(_))
    ));
    assert_eq!(handle.fight_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn turns_alternate_between_player_and_mob() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    let (connection, mut rx) = handle.open_connection();
    handle
        .start_fight(HERO, "Krets", Some(connection))
        .await
        .unwrap();
    drain(&mut rx);

    handle.attack(HERO, "chest").await.unwrap();
    let err = handle.attack(HERO, "head").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Fight(FightError::NotYourTurn)));

    let messages = drain(&mut rx);
    assert_eq!(log_texts(&messages), ["Hero deals 19 damage to Krets [1]."]);
    assert!(matches!(
        messages.last(),
        Some(PushMessage::TurnUpdate {
            turn_owner: TurnOwner::Mob,
            deadline: None,
            ..
        })
    ));

    sleep(Duration::from_millis(1_500)).await;

    let messages = drain(&mut rx);
    assert_eq!(log_texts(&messages), ["Krets [1] deals 2 damage to Hero."]);
    let fight = handle.active_fight(HERO).await.unwrap();
    assert_eq!(fight.state.turn_owner, TurnOwner::Player);
    assert_eq!(fight.state.player_hp, 98);
    assert_eq!(fight.state.mob_hp, 36);
    assert!(fight.state.deadline.is_some());

    handle.attack(HERO, "LEGS").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn invalid_attack_types_are_rejected() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    handle.start_fight(HERO, "Krets", None).await.unwrap();

    for attack in ["plain", "kick", ""] {
        let err = handle.attack(HERO, attack).await.unwrap_err();
        assert_eq!(err.code(), "invalid_attack_type", "{attack:?}");
    }
    let fight = handle.active_fight(HERO).await.unwrap();
    assert_eq!(fight.state.mob_hp, 55);
    assert_eq!(fight.log_history.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn attack_without_fight_fails() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    let err = handle.attack(HERO, "chest").await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoActiveFight));
    let err = handle.leave(HERO).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoActiveFight));
}

#[tokio::test(start_paused = true)]
async fn timeout_applies_exactly_one_plain_attack() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    handle.start_fight(HERO, "Krets", None).await.unwrap();

    sleep(Duration::from_millis(9_900)).await;
    let fight = handle.active_fight(HERO).await.unwrap();
    assert_eq!(fight.state.mob_hp, 55);

    sleep(Duration::from_millis(200)).await;
    let fight = handle.active_fight(HERO).await.unwrap();
    assert_eq!(fight.state.mob_hp, 46);
    assert_eq!(fight.state.turn_owner, TurnOwner::Mob);
    let auto: Vec<_> = fight
        .log_history
        .iter()
        .filter(|entry| entry.starts_with("[Auto] "))
        .collect();
    assert_eq!(auto, ["[Auto] Hero deals 9 damage to Krets [1]."]);

    // The timeout already fired; a late choice for the same turn is refused.
    let err = handle.attack(HERO, "chest").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Fight(FightError::NotYourTurn)));

    // Mob answers after 1 s and the next player turn gets a fresh deadline.
    sleep(Duration::from_secs(2)).await;
    let fight = handle.active_fight(HERO).await.unwrap();
    assert_eq!(fight.state.turn_owner, TurnOwner::Player);
    assert_eq!(fight.state.mob_hp, 46);
    assert_eq!(
        fight
            .log_history
            .iter()
            .filter(|entry| entry.starts_with("[Auto] "))
            .count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn attack_after_deadline_is_refused_before_timer_runs() {
    let runtime = scripted_runtime(provider_with_hero(100));
    let handle = runtime.handle();
    handle.start_fight(HERO, "Krets", None).await.unwrap();

    // Whether or not the timer task has run yet, the deadline has passed and
    // the choice is refused.
    tokio::time::advance(Duration::from_millis(10_001)).await;
    let err = handle.attack(HERO, "chest").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Fight(FightError::NotYourTurn)));

    sleep(Duration::from_millis(10)).await;
    let fight = handle.active_fight(HERO).await.unwrap();
    let player_attacks = fight
        .log_history
        .iter()
        .filter(|entry| entry.contains("Hero deals"))
        .count();
    assert_eq!(player_attacks, 1);
    assert_eq!(fight.state.mob_hp, 46);
}

#[tokio::test(start_paused = true)]
async fn three_chest_hits_win_and_settle() {
    let provider = provider_with_hero(100);
    let runtime = scripted_runtime(Arc::clone(&provider));
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle).await;
    let (connection, mut rx) = handle.open_connection();
    handle
        .start_fight(HERO, "Krets", Some(connection))
        .await
        .unwrap();

    handle.attack(HERO, "chest").await.unwrap();
    sleep(Duration::from_millis(1_500)).await;
    handle.attack(HERO, "chest").await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    let err = handle.leave(HERO).await.unwrap_err();
    assert!(matches!(err, RuntimeError::FightActive));

    handle.attack(HERO, "chest").await.unwrap();

    let messages = drain(&mut rx);
    let over = messages
        .iter()
        .find_map(|message| match message {
            PushMessage::FightOver {
                result,
                message,
                loot_copper,
                exp_gained,
                stats,
                state,
                ..
            } => Some((*result, message.clone(), *loot_copper, *exp_gained, *stats, state.clone())),
            _ => None,
        })
        .expect("fight_over pushed");
    assert_eq!(over.0, FightStatus::Victory);
    assert_eq!(over.1, "Victorious! You defeated Krets [1]! Loot: 40c");
    assert_eq!(over.2, 40);
    assert_eq!(over.3, 5);
    assert_eq!(over.4.player_damage_dealt, 57);
    assert_eq!(over.4.turns, 5);
    assert_eq!(over.5.mob_hp, 0);
    assert_eq!(over.5.deadline, None);

    let profile = provider.profile(HERO).await.unwrap();
    assert_eq!(profile.copper, 40);
    assert_eq!(profile.experience, 5);
    assert_eq!(profile.current_hp, 96);
    assert_eq!(provider.history(HERO).await.len(), 1);

    // Terminal fights stay until acknowledged, then leave removes them.
    let err = handle.attack(HERO, "chest").await.unwrap_err();
    assert_eq!(err.code(), "fight_over");
    assert!(handle.active_fight(HERO).await.is_none());
    assert_eq!(handle.fight_count().await, 1);
    handle.leave(HERO).await.unwrap();
    assert_eq!(handle.fight_count().await, 0);
    assert!(matches!(
        drain(&mut rx).last(),
        Some(PushMessage::FightLeft { .. })
    ));

    let mut seen = Vec::new();
    while let Ok(event) = lifecycle.try_recv() {
        seen.push(event);
    }
    assert!(matches!(seen.first(), Some(FightEvent::Started { .. })));
    assert!(seen.iter().any(|event| matches!(
        event,
        FightEvent::Finished {
            result: FightStatus::Victory,
            ..
        }
    )));
    assert!(matches!(seen.last(), Some(FightEvent::Removed { .. })));
}

#[tokio::test(start_paused = true)]
async fn defeat_leaves_player_with_one_hp() {
    let provider = provider_with_hero(2);
    let runtime = scripted_runtime(Arc::clone(&provider));
    let handle = runtime.handle();
    handle.start_fight(HERO, "Krets", None).await.unwrap();

    handle.attack(HERO, "chest").await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    // A finished fight is no longer active, but rejoin still replays it.
    assert!(handle.active_fight(HERO).await.is_none());
    let fight = handle
        .rejoin(HERO, handle.open_connection().0)
        .await
        .unwrap();
    assert_eq!(fight.state.status, FightStatus::Defeat);
    assert_eq!(fight.state.player_hp, 0);
    assert_eq!(
        fight.log_history.last().map(String::as_str),
        Some("Defeat! You were slain by Krets [1]!")
    );

    let profile = provider.profile(HERO).await.unwrap();
    assert_eq!(profile.current_hp, 1);
    assert_eq!(profile.copper, 0);
    let history = provider.history(HERO).await;
    assert_eq!(history[0].result, FightStatus::Defeat);
    assert_eq!(history[0].reward, None);

    // No timers survive the terminal transition.
    sleep(Duration::from_secs(60)).await;
    let fight = handle
        .rejoin(HERO, handle.open_connection().0)
        .await
        .unwrap();
    assert_eq!(fight.log_history.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn finished_fight_is_replaced_by_new_start() {
    let runtime = scripted_runtime(provider_with_hero(2));
    let handle = runtime.handle();
    handle.start_fight(HERO, "Krets", None).await.unwrap();
    handle.attack(HERO, "chest").await.unwrap();
    sleep(Duration::from_millis(1_500)).await;
    assert!(handle.active_fight(HERO).await.is_none());
    assert_eq!(handle.fight_count().await, 1);

    let view = handle.start_fight(HERO, "Skeleton", None).await.unwrap();
    assert_eq!(view.status, FightStatus::Ongoing);
    assert_eq!(view.mob_id, "Skeleton");
    assert_eq!(view.player_hp, 1);
    assert_eq!(handle.fight_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_forfeits_ongoing_fights() {
    let provider = Arc::new(
        InMemoryStatProvider::new()
            .with_player(HERO, hero_profile(100))
            .with_player("rival@example.com", hero_profile(100)),
    );
    let runtime = scripted_runtime(Arc::clone(&provider));
    let handle = runtime.handle();
    let (connection, mut rx) = handle.open_connection();
    handle
        .start_fight(HERO, "Krets", Some(connection))
        .await
        .unwrap();
    handle
        .start_fight("rival@example.com", "Skeleton", None)
        .await
        .unwrap();
    drain(&mut rx);

    assert_eq!(runtime.shutdown().await, 2);

    assert!(drain(&mut rx).iter().any(|message| matches!(
        message,
        PushMessage::FightOver {
            result: FightStatus::Defeat,
            ..
        }
    )));
    assert_eq!(provider.history(HERO).await.len(), 1);
    assert_eq!(provider.history("rival@example.com").await.len(), 1);
    assert_eq!(provider.profile(HERO).await.unwrap().current_hp, 100);
}
