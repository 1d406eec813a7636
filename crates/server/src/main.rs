//! Demonstration server: hosts one match between two scripted bots.
mod bot;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tactics_core::{GameError, PlayerId, TurnEvent};
use tactics_runtime::{
    AbilityEffect, Arena, Event, Runtime, RuntimeConfig, RuntimeHandle, StandardExecutor, Topic,
    UnitRecord,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bot::SkirmishBot;

const BOARD_SIZE: u32 = 8;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging()?;

    let config = match env::var("TACTICS_CONFIG") {
        Ok(path) => RuntimeConfig::from_json_file(&path)
            .with_context(|| format!("loading runtime config from {path}"))?,
        Err(_) => RuntimeConfig::from_env(),
    };
    let bot_delay = env::var("TACTICS_BOT_DELAY_MS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(250));
    info!(?config, ?bot_delay, "Starting demonstration match");

    let mut arena = Arena::new(BOARD_SIZE, BOARD_SIZE);
    for (id, owner, position, speed) in bot::line_up(BOARD_SIZE, BOARD_SIZE) {
        arena.spawn(UnitRecord::new(id, owner, position).with_speed(speed))?;
    }

    let runtime = Runtime::builder()
        .config(config)
        .arena(arena)
        .executor(StandardExecutor::new().with_effect(bot::STRIKE, AbilityEffect::damage(9)))
        .build()
        .await?;
    let handle = runtime.handle();

    let logger = tokio::spawn(log_turn_events(handle.subscribe(Topic::Turn)));
    play(&handle, SkirmishBot::new(BOARD_SIZE, BOARD_SIZE), bot_delay).await?;

    drop(handle);
    runtime.shutdown().await?;
    logger.await?;
    Ok(())
}

/// Lets both bots submit each turn until the match ends.
async fn play(handle: &RuntimeHandle, bot: SkirmishBot, delay: Duration) -> Result<()> {
    loop {
        let snapshot = handle.query_turn().await?;
        if let Some(outcome) = snapshot.outcome {
            info!(winner = ?outcome.winner, reason = %outcome.reason, turn = outcome.turn, "Game over");
            return Ok(());
        }

        let units = handle.query_units().await?;
        for player in PlayerId::ALL {
            if snapshot.is_locked(player) {
                continue;
            }
            let Some(action) = bot.choose(player, &units) else {
                continue;
            };
            if let Err(error) = handle.submit_action(player, action).await? {
                warn!(%player, code = error.error_code(), %error, "Bot action rejected");
            }
        }

        // A rejected bot passes instead of stalling the turn.
        let after = handle.query_turn().await?;
        if !after.is_over() && after.turn_number == snapshot.turn_number {
            debug!(turn = snapshot.turn_number, "Forcing resolution");
            if let Err(error) = handle.force_resolution().await {
                warn!(%error, "Forced resolution failed");
            }
        }

        tokio::time::sleep(delay).await;
    }
}

async fn log_turn_events(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Turn(event)) => log_turn_event(&event),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Turn event logger lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn log_turn_event(event: &TurnEvent) {
    match event {
        TurnEvent::ActionsResolved { report } => {
            for action in &report.actions {
                info!(
                    turn = report.turn,
                    actor = %action.actor,
                    kind = action.kind.as_snake_case(),
                    resolution = ?action.resolution(),
                    "Action resolved"
                );
            }
        }
        TurnEvent::GameEnded { outcome } => {
            info!(winner = ?outcome.winner, reason = %outcome.reason, "Match ended");
        }
        other => debug!(event = other.as_snake_case(), ?other, "Turn event"),
    }
}

/// Setup logging to stderr and, when `TACTICS_LOG_DIR` is set, to a file
fn setup_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match env::var_os("TACTICS_LOG_DIR").map(PathBuf::from) {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("creating log directory {}", log_dir.display()))?;
            let file_appender = tracing_appender::rolling::never(&log_dir, "server.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            // Leak the guard to keep file writer alive
            std::mem::forget(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
