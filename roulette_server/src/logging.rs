//! Structured logging configuration.
//!
//! The game library logs through the `log` facade; the subscriber installed
//! here picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Levels are configurable via the `RUST_LOG` env var and default to
/// `info` with HTTP internals turned down.
///
/// # Example
///
/// ```no_run
/// use roulette_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,tower_http=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a handled chat command
///
/// # Arguments
///
/// * `session_key` - Chat room the command came from
/// * `player` - Resolved player identity
/// * `command` - Command name
/// * `result` - `ok` or the error kind
///
/// # Example
///
/// ```
/// use roulette_server::logging::log_command;
///
/// log_command(-1001, "alice", "pull", "not_your_turn");
/// ```
pub fn log_command(session_key: i64, player: &str, command: &str, result: &str) {
    if result == "ok" {
        tracing::info!(
            session_key = session_key,
            player = player,
            command = command,
            "Command handled"
        );
    } else {
        tracing::debug!(
            session_key = session_key,
            player = player,
            command = command,
            result = result,
            "Command rejected"
        );
    }
}

/// Log the end of a game
pub fn log_game_finished(session_key: i64, reason: &str, player: Option<&str>) {
    tracing::info!(
        session_key = session_key,
        reason = reason,
        player = player,
        "Game finished"
    );
}
