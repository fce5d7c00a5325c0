//! Prometheus metrics for monitoring roulette sessions.
//!
//! Metrics are exposed in Prometheus text format on a separate listener
//! when `METRICS_BIND` is configured. Without an installed exporter the
//! recording helpers are no-ops.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use roulette_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::command_processed("pull", "ok");
//! metrics::active_sessions(3);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use roulette::RouletteError;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Stable label for an error, used in metrics and logs.
pub fn error_kind(error: &RouletteError) -> &'static str {
    match error {
        RouletteError::AlreadyActive => "already_active",
        RouletteError::NoActiveGame => "no_active_game",
        RouletteError::DuplicatePlayer { .. } => "duplicate_player",
        RouletteError::InsufficientPlayers { .. } => "insufficient_players",
        RouletteError::NotYourTurn { .. } => "not_your_turn",
        RouletteError::MustPullFirst => "must_pull_first",
        RouletteError::AlreadyActedThisTurn => "already_acted_this_turn",
        RouletteError::NoSkipsLeft => "no_skips_left",
        RouletteError::NotStarted => "not_started",
        RouletteError::AlreadyStarted => "already_started",
        RouletteError::InternalStateError => "internal_state_error",
    }
}

/// Increment the handled command counter.
pub fn command_processed(command: &str, result: &str) {
    metrics::counter!("roulette_commands_total",
        "command" => command.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

/// Increment the finished games counter.
pub fn game_finished(reason: &str) {
    metrics::counter!("roulette_games_finished_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Set current live sessions count.
pub fn active_sessions(count: usize) {
    metrics::gauge!("roulette_active_sessions").set(count as f64);
}
