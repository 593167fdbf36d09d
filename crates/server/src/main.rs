//! Combat server entry point.
mod config;
mod gateway;
mod logging;
mod protocol;
mod query;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::sync::broadcast::error::RecvError;
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use game_content::{ContentFactory, WorldContent};
use runtime::{FightEvent, InMemoryStatProvider, MobOracleImpl, Runtime, RuntimeHandle, Topic};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    logging::setup_logging(config.log_directory().as_deref())?;

    let content = load_content(&config)?;
    let runtime = Runtime::builder()
        .config(config.runtime_config(content.combat.clone()))
        .mob_oracle(MobOracleImpl::from_content(&content))
        .stat_provider(std::sync::Arc::new(InMemoryStatProvider::with_auto_register()))
        .build();

    let lifecycle = runtime.subscribe(Topic::Lifecycle).await;
    tokio::spawn(log_lifecycle(lifecycle));

    let app = router(runtime.handle());
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(bind = %config.bind, "combat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let forfeited = runtime.shutdown().await;
    tracing::info!(forfeited, "combat server stopped");
    Ok(())
}

fn router(handle: RuntimeHandle) -> Router {
    Router::new()
        .route("/healthz", get(query::healthz))
        .route("/ws/fight", get(gateway::fight_socket))
        .route("/fight/active/{player_id}", get(query::active_fight))
        .route("/world/mobs/{region}", get(query::region_mobs))
        .layer(TraceLayer::new_for_http())
        .with_state(handle)
}

fn load_content(config: &ServerConfig) -> Result<WorldContent> {
    match &config.content_dir {
        Some(dir) => {
            let content = ContentFactory::new(dir)
                .load_world()
                .with_context(|| format!("Failed to load content from {}", dir.display()))?;
            tracing::info!(
                dir = %dir.display(),
                mobs = content.mobs.len(),
                regions = content.regions.len(),
                "content loaded"
            );
            Ok(content)
        }
        None => {
            tracing::info!("using built-in content");
            Ok(WorldContent::builtin())
        }
    }
}

async fn log_lifecycle(mut events: tokio::sync::broadcast::Receiver<FightEvent>) {
    loop {
        match events.recv().await {
            Ok(FightEvent::Finished {
                player_id,
                mob_id,
                result,
                reward,
            }) => {
                let reward = reward.unwrap_or_default();
                tracing::info!(
                    player = %player_id,
                    mob = %mob_id,
                    %result,
                    exp = reward.exp_gained,
                    loot_copper = reward.loot_copper,
                    leveled_up = reward.leveled_up,
                    "fight finished"
                );
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "lifecycle subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
