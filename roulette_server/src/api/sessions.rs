//! Session API handlers.
//!
//! A chat transport forwards every message it receives in a room to
//! `POST /api/v1/sessions/{session_key}/commands` and posts the returned
//! `messages` back into that room.
//!
//! # Examples
//!
//! Pull the trigger in chat `-1001`:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/sessions/-1001/commands \
//!   -H "Content-Type: application/json" \
//!   -d '{"sender": {"id": 7, "username": "alice"}, "text": "/pull"}'
//! ```
//!
//! Inspect the room's game:
//! ```bash
//! curl http://localhost:6969/api/v1/sessions/-1001
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roulette::{
    Outcome, RouletteError,
    entities::{Command, GameView, PlayerId},
    session::SessionKey,
};
use serde::{Deserialize, Serialize};

use super::{AppState, request_id::RequestId};
use crate::{
    commands::{Sender, parse_command},
    logging, metrics, render,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandRequest {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Whether the command was accepted by the game
    pub ok: bool,
    /// Identity the sender was resolved to
    pub player: PlayerId,
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RouletteError>,
    /// Lines to post back to the room, in order
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Run one chat command against a session.
///
/// Game-level rejections (not your turn, no skips left, ...) are ordinary
/// replies for the room and come back as `200 OK` with `ok: false`.
///
/// # Errors
///
/// * `400 Bad Request` - The text is not a recognised command
pub async fn post_command(
    State(state): State<AppState>,
    Path(session_key): Path<SessionKey>,
    request_id: RequestId,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, (StatusCode, Json<ErrorResponse>)> {
    let player = request.sender.player_id();

    let command = parse_command(&request.text).map_err(|e| {
        metrics::command_processed("unknown", "parse_error");
        tracing::debug!(
            request_id = %request_id.as_str(),
            session_key = session_key,
            "Unparseable command: {}",
            e
        );
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let result = state
        .session_manager
        .handle(session_key, &player, command)
        .await;

    let command_name = command.to_string();
    let response = match result {
        Ok(outcome) => {
            record_finish(session_key, &outcome);
            logging::log_command(session_key, player.as_str(), &command_name, "ok");
            metrics::command_processed(&command_name, "ok");

            CommandResponse {
                ok: true,
                messages: render::render_outcome(&outcome),
                outcome: Some(outcome),
                error: None,
                player,
                command,
            }
        }
        Err(e) => {
            let kind = metrics::error_kind(&e);
            if e == RouletteError::InternalStateError {
                tracing::error!(
                    request_id = %request_id.as_str(),
                    session_key = session_key,
                    "Internal state error while handling {}",
                    command_name
                );
            }
            logging::log_command(session_key, player.as_str(), &command_name, kind);
            metrics::command_processed(&command_name, kind);

            CommandResponse {
                ok: false,
                messages: vec![render::render_error(&e, command)],
                outcome: None,
                error: Some(e),
                player,
                command,
            }
        }
    };

    metrics::active_sessions(state.session_manager.session_count().await);

    Ok(Json(response))
}

/// Get the public view of a session's game.
///
/// # Errors
///
/// * `404 Not Found` - No game occupies the session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_key): Path<SessionKey>,
) -> Result<Json<GameView>, (StatusCode, Json<ErrorResponse>)> {
    state
        .session_manager
        .view(session_key)
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: RouletteError::NoActiveGame.to_string(),
                }),
            )
        })
}

fn record_finish(session_key: SessionKey, outcome: &Outcome) {
    match outcome {
        Outcome::Fatal { player } => {
            metrics::game_finished("fatal");
            logging::log_game_finished(session_key, "fatal", Some(player.as_str()));
        }
        Outcome::Stopped => {
            metrics::game_finished("stopped");
            logging::log_game_finished(session_key, "stopped", None);
        }
        _ => {}
    }
}
