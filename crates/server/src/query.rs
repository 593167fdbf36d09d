//! Read-only HTTP queries over the runtime.
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use game_core::MobDefinition;
use runtime::{ActiveFight, RuntimeHandle};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub fights: usize,
}

pub async fn healthz(State(handle): State<RuntimeHandle>) -> Json<Health> {
    Json(Health {
        status: "ok",
        fights: handle.fight_count().await,
    })
}

/// `GET /fight/active/{player_id}`: the fight state and full log, or 404.
pub async fn active_fight(
    State(handle): State<RuntimeHandle>,
    Path(player_id): Path<String>,
) -> Result<Json<ActiveFight>, StatusCode> {
    handle
        .active_fight(&player_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `GET /world/mobs/{region}`. Unknown regions have no mobs.
pub async fn region_mobs(
    State(handle): State<RuntimeHandle>,
    Path(region): Path<String>,
) -> Json<Vec<MobDefinition>> {
    Json(handle.region_mobs(&region))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use game_core::testing::ScriptedRng;
    use game_core::{CombatRng, CombatantSnapshot, FightStatus};
    use runtime::{InMemoryStatProvider, PlayerProfile, Runtime};

    use super::*;

    /// Scripted dice: every attack is a plain hit, the hero's chest hit deals
    /// 19 and Krets hits back for 2 after 1 s.
    fn scripted_runtime(current_hp: u32) -> Runtime {
        let profile = PlayerProfile {
            snapshot: CombatantSnapshot {
                strength: 20,
                weapon_damage: 15,
                ..CombatantSnapshot::novice("hero", "Hero")
            },
            current_hp,
            experience: 0,
            copper: 0,
        };
        Runtime::builder()
            .stat_provider(Arc::new(
                InMemoryStatProvider::new().with_player("hero", profile),
            ))
            .rng_source(|| Box::new(ScriptedRng::new()) as Box<dyn CombatRng>)
            .build()
    }

    async fn status(handle: &RuntimeHandle) -> Result<FightStatus, StatusCode> {
        active_fight(State(handle.clone()), Path("hero".into()))
            .await
            .map(|Json(fight)| fight.state.status)
    }

    #[tokio::test(start_paused = true)]
    async fn victory_is_no_longer_active() {
        let runtime = scripted_runtime(100);
        let handle = runtime.handle();
        handle.start_fight("hero", "Krets", None).await.unwrap();

        for _ in 0..2 {
            handle.attack("hero", "chest").await.unwrap();
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            assert_eq!(status(&handle).await, Ok(FightStatus::Ongoing));
        }
        handle.attack("hero", "chest").await.unwrap();

        assert_eq!(status(&handle).await, Err(StatusCode::NOT_FOUND));
        // Still registered until the player leaves.
        assert_eq!(handle.fight_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn defeat_is_no_longer_active() {
        let runtime = scripted_runtime(2);
        let handle = runtime.handle();
        handle.start_fight("hero", "Krets", None).await.unwrap();
        handle.attack("hero", "chest").await.unwrap();
        assert_eq!(status(&handle).await, Ok(FightStatus::Ongoing));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(status(&handle).await, Err(StatusCode::NOT_FOUND));
    }

    #[tokio::test(start_paused = true)]
    async fn active_fight_is_404_until_started() {
        let runtime = Runtime::builder().seeded(3).build();
        let handle = runtime.handle();

        let missing = active_fight(State(handle.clone()), Path("hero".into())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);

        handle.start_fight("hero", "Krets", None).await.unwrap();
        let Json(fight) = active_fight(State(handle.clone()), Path("hero".into()))
            .await
            .unwrap();
        assert_eq!(fight.state.mob_name, "Krets [1]");
        assert_eq!(fight.log_history, ["Battle begins! hero vs Krets [1]!"]);

        let Json(health) = healthz(State(handle)).await;
        assert_eq!(health.fights, 1);
    }

    #[tokio::test]
    async fn region_mobs_lists_catalog_entries() {
        let runtime = Runtime::builder().build();
        let handle = runtime.handle();

        let Json(mobs) = region_mobs(State(handle.clone()), Path("King's Tomb".into())).await;
        let names: Vec<_> = mobs.iter().map(|mob| mob.id.as_str()).collect();
        assert_eq!(names, ["Aggressive Krets", "Skeleton"]);

        let Json(none) = region_mobs(State(handle), Path("Nowhere".into())).await;
        assert!(none.is_empty());
    }
}
