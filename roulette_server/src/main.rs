//! Russian roulette chat game server.
//!
//! Chat transports POST room messages to this server; each room's game
//! runs in its own session actor inside the shared registry.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Error};
use pico_args::Arguments;
use roulette::session::SessionManager;
use roulette_server::{api, config::ServerConfig, logging, metrics};
use tracing::info;

const HELP: &str = "\
Run the Russian roulette chat game server

USAGE:
  roulette_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --seed       N           Seed bullet placement for reproducible games  [default: env ROULETTE_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND               Prometheus scrape address, disabled when unset
  ROULETTE_CHAMBERS          Chambers per cylinder  [default: 6]
  ROULETTE_SKIPS_PER_PLAYER  Skips each player gets per game  [default: 2]
  ROULETTE_MIN_PLAYERS       Players needed to begin  [default: 2]
  ROULETTE_SEED              Seed for bullet placement
  SESSION_INBOX_CAPACITY     Queued commands per session  [default: 64]
  RUST_LOG                   Log filter  [default: info]
";

struct Args {
    bind: Option<SocketAddr>,
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.seed)?;
    config.validate()?;

    info!(
        "Game rules: {} chambers, {} skips per player, {} players to begin, bullets {}",
        config.registry.game.chambers,
        config.registry.game.skips_per_player,
        config.registry.game.min_players,
        config.registry.bullets
    );

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics available at http://{}/metrics", metrics_bind);
    }

    let session_manager = Arc::new(SessionManager::new(config.registry.clone()));
    metrics::active_sessions(0);

    let app = api::create_router(api::AppState { session_manager });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
