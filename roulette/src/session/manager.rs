//! Session manager mapping chat rooms to live game actors.

use super::{
    actor::{SessionActor, SessionHandle},
    config::{BulletSource, RegistryConfig},
    messages::SessionResult,
};
use crate::game::{
    Outcome, RouletteError, RouletteState,
    entities::{Command, Cylinder, GameView, Phase, PlayerId},
};
use rand::{SeedableRng, rngs::StdRng};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::{Mutex, RwLock};

/// Opaque session identifier, one per chat room
pub type SessionKey = i64;

/// Registry holding at most one live game per session
pub struct SessionManager {
    /// Registry configuration
    config: RegistryConfig,

    /// Live session handles
    sessions: Arc<RwLock<HashMap<SessionKey, SessionHandle>>>,

    /// Next game generation
    next_generation: AtomicU64,

    /// Registry-wide RNG for seeded bullet placement
    seeded_rng: Option<Mutex<StdRng>>,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// # Arguments
    ///
    /// * `config` - Registry configuration, assumed already validated
    ///
    /// # Returns
    ///
    /// * `SessionManager` - New, empty registry
    pub fn new(config: RegistryConfig) -> Self {
        let seeded_rng = match config.bullets {
            BulletSource::Seeded(seed) => Some(Mutex::new(StdRng::seed_from_u64(seed))),
            BulletSource::Random | BulletSource::Fixed(_) => None,
        };

        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_generation: AtomicU64::new(1),
            seeded_rng,
        }
    }

    /// Get the live session for a key
    ///
    /// # Returns
    ///
    /// * `Option<SessionHandle>` - Handle if a game occupies the session
    pub async fn get(&self, key: SessionKey) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&key)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Get a public snapshot of the session's game
    pub async fn view(&self, key: SessionKey) -> Option<GameView> {
        self.get(key).await?.view().await
    }

    /// Create a new game in a session
    ///
    /// Fails with [`RouletteError::AlreadyActive`] while an unfinished game
    /// occupies the session. A finished or abandoned game is replaced.
    ///
    /// # Arguments
    ///
    /// * `key` - Session key
    /// * `host` - Player opening the lobby, joined automatically
    ///
    /// # Returns
    ///
    /// * `Result<Outcome, RouletteError>` - `Outcome::Created` or error
    pub async fn create(&self, key: SessionKey, host: &PlayerId) -> SessionResult {
        let mut sessions = self.sessions.write().await;

        // The liveness check and the insert happen under one write lock so
        // concurrent creates for the same key resolve to a single game.
        if let Some(existing) = sessions.get(&key)
            && existing
                .view()
                .await
                .is_some_and(|view| view.phase != Phase::Finished)
        {
            return Err(RouletteError::AlreadyActive);
        }

        let cylinder = self.load_cylinder().await;
        let state = RouletteState::with_cylinder(host, self.config.game.clone(), cylinder);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (actor, handle) =
            SessionActor::new(key, generation, state, self.config.inbox_capacity);

        sessions.insert(key, handle);
        drop(sessions);

        // Spawn actor task
        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created session {} game {} hosted by {}", key, generation, host);

        Ok(Outcome::Created { host: host.clone() })
    }

    /// Remove a session, stopping its game if one is running. Idempotent.
    ///
    /// # Arguments
    ///
    /// * `key` - Session key
    pub async fn remove(&self, key: SessionKey) {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&key);
        drop(sessions);

        if let Some(handle) = removed {
            handle.close().await;
            log::info!("Removed session {}", key);
        }
    }

    /// Handle a command issued by a player in a session
    ///
    /// This is the whole in-process action API: `help` needs no game,
    /// `create` goes through [`SessionManager::create`], and everything else
    /// is forwarded to the session's actor. A session whose game ends is
    /// released before this returns.
    ///
    /// # Arguments
    ///
    /// * `key` - Session key
    /// * `player` - Resolved identity of the issuing player
    /// * `command` - Parsed command
    ///
    /// # Returns
    ///
    /// * `Result<Outcome, RouletteError>` - Outcome or game-level error
    pub async fn handle(
        &self,
        key: SessionKey,
        player: &PlayerId,
        command: Command,
    ) -> SessionResult {
        let result = match command {
            Command::Help => Ok(Outcome::Help),
            Command::Create => self.create(key, player).await,
            _ => self.forward(key, player, command).await,
        };

        match &result {
            Ok(_) => log::debug!("Session {}: {} issued {}", key, player, command),
            Err(e) => log::debug!("Session {}: {} issued {}: {}", key, player, command, e),
        }

        result
    }

    /// Get live session count
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|handle| !handle.is_closed()).count()
    }

    async fn forward(&self, key: SessionKey, player: &PlayerId, command: Command) -> SessionResult {
        let handle = self.get(key).await.ok_or(RouletteError::NoActiveGame)?;
        let result = handle.command(player.clone(), command).await;

        if result.as_ref().is_ok_and(Outcome::is_terminal) {
            self.release(handle.key(), handle.generation()).await;
        }

        result
    }

    /// Drop the session entry if it still points at the given game.
    async fn release(&self, key: SessionKey, generation: u64) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&key)
            .is_some_and(|handle| handle.generation() == generation)
        {
            sessions.remove(&key);
            log::info!("Released session {} game {}", key, generation);
        }
    }

    async fn load_cylinder(&self) -> Cylinder {
        let chambers = self.config.game.chambers;
        match (&self.seeded_rng, self.config.bullets) {
            (_, BulletSource::Fixed(chamber)) => Cylinder::with_bullet(chambers, chamber),
            (Some(rng), _) => {
                let mut rng = rng.lock().await;
                Cylinder::spin(chambers, &mut *rng)
            }
            (None, _) => Cylinder::spin(chambers, &mut rand::rng()),
        }
    }
}
