//! Phase definitions for the roulette FSM.
//!
//! Each state represents one phase of a game's lifecycle. Phases only move
//! forward: lobby, then active, then finished.

use serde::{Deserialize, Serialize};

use crate::game::entities::{FinishReason, TurnState};

/// Lobby state - collecting players before the first pull
#[derive(Debug, Default)]
pub struct Lobby {}

impl Lobby {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

/// Turns underway
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Active {
    pub turn: TurnState,
}

/// Terminal state. A finished game accepts no further actions.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Finished {
    pub reason: FinishReason,
}
