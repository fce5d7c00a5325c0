//! Session actor implementation with async message handling.

use super::{
    manager::SessionKey,
    messages::{SessionMessage, SessionResult},
};
use crate::game::{
    GameStateManagement, RouletteError, RouletteState,
    entities::{Command, GameView, PlayerId},
};
use tokio::sync::{mpsc, oneshot};

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    key: SessionKey,
    generation: u64,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>, key: SessionKey, generation: u64) -> Self {
        Self {
            sender,
            key,
            generation,
        }
    }

    /// Get session key
    pub fn key(&self) -> SessionKey {
        self.key
    }

    /// Registry-unique id of the game behind this handle. A new game in the
    /// same session gets a new generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the actor has shut down
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> Result<(), RouletteError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RouletteError::NoActiveGame)
    }

    /// Issue a player command and wait for its result.
    ///
    /// A game that finishes while the command is queued behind the fatal
    /// pull answers with [`RouletteError::NoActiveGame`].
    pub async fn command(&self, player: PlayerId, command: Command) -> SessionResult {
        let (tx, rx) = oneshot::channel();
        self.send(SessionMessage::Command {
            player,
            command,
            response: tx,
        })
        .await?;
        rx.await.map_err(|_| RouletteError::NoActiveGame)?
    }

    /// Get a snapshot of the game, or `None` if the actor is gone
    pub async fn view(&self) -> Option<GameView> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionMessage::GetView { response: tx }).await.ok()?;
        rx.await.ok()
    }

    /// Stop the game and wait for the actor to acknowledge
    pub async fn close(&self) {
        let (tx, rx) = oneshot::channel();
        if self.send(SessionMessage::Close { response: tx }).await.is_ok() {
            let _ = rx.await;
        }
    }
}

/// Session actor owning the game of a single chat room
pub struct SessionActor {
    /// Session key
    key: SessionKey,

    /// Game generation within the registry
    generation: u64,

    /// Roulette game state (FSM)
    state: RouletteState,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Arguments
    ///
    /// * `key` - Session key
    /// * `generation` - Registry-unique game id
    /// * `state` - Freshly created game, normally in the lobby
    /// * `inbox_capacity` - Bound of the message inbox
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(
        key: SessionKey,
        generation: u64,
        state: RouletteState,
        inbox_capacity: usize,
    ) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity.max(1));

        let actor = Self {
            key,
            generation,
            state,
            inbox,
        };

        let handle = SessionHandle::new(sender, key, generation);

        (actor, handle)
    }

    /// Run the session actor event loop until the game finishes or every
    /// handle is dropped
    pub async fn run(mut self) {
        log::debug!("Session {} game {} starting", self.key, self.generation);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.state.is_finished() {
                break;
            }
        }

        match self.state.finish_reason() {
            Some(reason) => log::info!(
                "Session {} game {} finished: {}",
                self.key,
                self.generation,
                reason
            ),
            None => log::info!(
                "Session {} game {} abandoned in {} phase",
                self.key,
                self.generation,
                self.state.phase()
            ),
        }
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Command {
                player,
                command,
                response,
            } => {
                let result = self.state.apply(&player, command);
                match &result {
                    Ok(_) => log::debug!("Session {}: {} {} ok", self.key, player, command),
                    Err(e) => log::debug!("Session {}: {} {} rejected: {}", self.key, player, command, e),
                }
                let _ = response.send(result);
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.state.get_view());
            }

            SessionMessage::Close { response } => {
                let _ = self.state.stop();
                let _ = response.send(());
            }
        }
    }
}
