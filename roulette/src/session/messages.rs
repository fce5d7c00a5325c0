//! Session actor message types.

use crate::game::{
    Outcome, RouletteError,
    entities::{Command, GameView, PlayerId},
};
use tokio::sync::oneshot;

/// What every player command resolves to
pub type SessionResult = Result<Outcome, RouletteError>;

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Player command (join, begin, pull, pass, skip, stop, status)
    Command {
        player: PlayerId,
        command: Command,
        response: oneshot::Sender<SessionResult>,
    },

    /// Get a public snapshot of the game
    GetView {
        response: oneshot::Sender<GameView>,
    },

    /// Stop the game and shut the actor down
    Close { response: oneshot::Sender<()> },
}
