//! Roulette game state machine implementation.
//!
//! It provides the phase types, the transition rules for every player
//! action, and the game data shared across all phases.

use enum_dispatch::enum_dispatch;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::constants::{CHAMBER_COUNT, DEFAULT_SKIPS_PER_PLAYER, MIN_PLAYERS};
use super::entities::{
    Command, Cylinder, FinishReason, GameView, Phase, PlayerId, PlayerStanding, Trigger, TurnState,
};
use super::states::{Active, Finished, Lobby};

/// Errors that can occur during player actions.
///
/// None of these are fatal to the process; the game is left exactly as it
/// was before the offending action.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RouletteError {
    #[error("a game is already in progress")]
    AlreadyActive,
    #[error("no active game")]
    NoActiveGame,
    #[error("{player} already joined")]
    DuplicatePlayer { player: PlayerId },
    #[error("need {required}+ players, have {joined}")]
    InsufficientPlayers { required: usize, joined: usize },
    #[error("not your turn, waiting for {expected}")]
    NotYourTurn { expected: PlayerId },
    #[error("must pull the trigger before passing")]
    MustPullFirst,
    #[error("already pulled this turn, pass instead")]
    AlreadyActedThisTurn,
    #[error("no skips left")]
    NoSkipsLeft,
    #[error("game has not started")]
    NotStarted,
    #[error("game already started")]
    AlreadyStarted,
    #[error("invalid game state: internal consistency error")]
    InternalStateError,
}

/// Successful result of a player action.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Created {
        host: PlayerId,
    },
    Joined {
        player: PlayerId,
        players: Vec<PlayerId>,
    },
    Began {
        first: PlayerId,
        players: Vec<PlayerId>,
    },
    /// Empty chamber. The same player keeps the turn.
    Survived {
        player: PlayerId,
        remaining_chambers: usize,
        fatal_odds_next_pct: f64,
    },
    /// The bullet fired. The game is over.
    Fatal {
        player: PlayerId,
    },
    Passed {
        player: PlayerId,
        next: PlayerId,
    },
    Skipped {
        player: PlayerId,
        skips_left: u8,
        next: PlayerId,
    },
    Stopped,
    Status(GameView),
    Help,
}

impl Outcome {
    /// Whether this outcome ended the game and released its session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fatal { .. } | Self::Stopped)
    }
}

/// Game configuration settings
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub chambers: usize,
    pub skips_per_player: u8,
    pub min_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(CHAMBER_COUNT, DEFAULT_SKIPS_PER_PLAYER, MIN_PLAYERS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(chambers: usize, skips_per_player: u8, min_players: usize) -> Self {
        Self {
            chambers,
            skips_per_player,
            min_players,
        }
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        if self.chambers < 2 {
            return Err("Cylinder needs at least 2 chambers".to_string());
        }

        if self.min_players < 2 {
            return Err("Games need at least 2 players".to_string());
        }

        Ok(())
    }
}

/// Mutable game data shared across all phases
#[derive(Debug)]
pub struct GameData {
    /// Players in join order. Turn order follows this order.
    pub players: Vec<PlayerId>,
    /// Remaining skip allowance per player.
    pub(super) skips: HashMap<PlayerId, u8>,
    pub(super) cylinder: Cylinder,
    /// Monotonic turn counter. The acting player is
    /// `players[turn_index % players.len()]`.
    pub turn_index: usize,
    pub(super) settings: GameSettings,
}

impl Default for GameData {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            players: Vec::new(),
            skips: HashMap::new(),
            cylinder: Cylinder::with_bullet(settings.chambers, 0),
            turn_index: 0,
            settings,
        }
    }
}

impl GameData {
    fn player_at(&self, turn_index: usize) -> Option<&PlayerId> {
        if self.players.is_empty() {
            return None;
        }
        self.players.get(turn_index % self.players.len())
    }

    fn standings(&self) -> Vec<PlayerStanding> {
        self.players
            .iter()
            .map(|player| PlayerStanding {
                player: player.clone(),
                skips_left: self.skips.get(player).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn pulls_fired(&self) -> usize {
        self.cylinder.fired()
    }
}

/// Marks a type as one of the game's phases.
pub trait PhaseState {
    const PHASE: Phase;
}

impl PhaseState for Lobby {
    const PHASE: Phase = Phase::Lobby;
}

impl PhaseState for Active {
    const PHASE: Phase = Phase::Active;
}

impl PhaseState for Finished {
    const PHASE: Phase = Phase::Finished;
}

/// Read-only queries available in every phase
#[enum_dispatch]
pub trait GameStateManagement {
    fn phase(&self) -> Phase;

    fn players(&self) -> &[PlayerId];

    /// Get a public snapshot of the game
    #[must_use]
    fn get_view(&self) -> GameView;
}

/// A roulette game with data and logic for running a game end-to-end.
#[derive(Debug)]
pub struct Game<T> {
    pub data: GameData,
    pub state: T,
}

impl<T: PhaseState> GameStateManagement for Game<T> {
    fn phase(&self) -> Phase {
        T::PHASE
    }

    fn players(&self) -> &[PlayerId] {
        &self.data.players
    }

    fn get_view(&self) -> GameView {
        let current_player = match T::PHASE {
            Phase::Active => self.data.player_at(self.data.turn_index).cloned(),
            Phase::Lobby | Phase::Finished => None,
        };
        GameView {
            phase: T::PHASE,
            players: self.data.standings(),
            current_player,
            pulls_fired: self.data.cylinder.fired(),
            chambers_left: self.data.cylinder.remaining(),
        }
    }
}

impl<T> Game<T> {
    fn into_finished(self, reason: FinishReason) -> Game<Finished> {
        Game {
            data: self.data,
            state: Finished { reason },
        }
    }
}

impl Game<Lobby> {
    pub fn new(host: &PlayerId, settings: GameSettings, cylinder: Cylinder) -> Self {
        let mut data = GameData {
            players: Vec::new(),
            skips: HashMap::new(),
            cylinder,
            turn_index: 0,
            settings,
        };
        data.players.push(host.clone());
        data.skips
            .insert(host.clone(), data.settings.skips_per_player);
        Self {
            data,
            state: Lobby::new(),
        }
    }

    pub fn join(&mut self, player: &PlayerId) -> Result<(), RouletteError> {
        if self.data.players.contains(player) {
            return Err(RouletteError::DuplicatePlayer {
                player: player.clone(),
            });
        }
        self.data.players.push(player.clone());
        self.data
            .skips
            .insert(player.clone(), self.data.settings.skips_per_player);
        Ok(())
    }

    fn ensure_enough_players(&self) -> Result<(), RouletteError> {
        let joined = self.data.players.len();
        let required = self.data.settings.min_players;
        if joined < required {
            return Err(RouletteError::InsufficientPlayers { required, joined });
        }
        Ok(())
    }
}

impl From<Game<Lobby>> for Game<Active> {
    fn from(mut value: Game<Lobby>) -> Self {
        value.data.turn_index = 0;
        Self {
            data: value.data,
            state: Active {
                turn: TurnState::AwaitingFirstAction,
            },
        }
    }
}

impl Game<Active> {
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.data.player_at(self.data.turn_index)
    }

    pub fn turn(&self) -> TurnState {
        self.state.turn
    }

    fn ensure_turn(&self, player: &PlayerId) -> Result<(), RouletteError> {
        let expected = self
            .current_player()
            .ok_or(RouletteError::InternalStateError)?;
        if expected != player {
            return Err(RouletteError::NotYourTurn {
                expected: expected.clone(),
            });
        }
        Ok(())
    }

    /// Hand the turn to the next player in join order.
    fn advance(&mut self) -> Result<PlayerId, RouletteError> {
        self.data.turn_index += 1;
        self.state.turn = TurnState::AwaitingFirstAction;
        self.current_player()
            .cloned()
            .ok_or(RouletteError::InternalStateError)
    }

    pub fn pull(&mut self, player: &PlayerId) -> Result<Trigger, RouletteError> {
        self.ensure_turn(player)?;
        let trigger = self.data.cylinder.trigger();
        if let Trigger::Click { .. } = trigger {
            self.state.turn = TurnState::CanPassOrPull;
        }
        Ok(trigger)
    }

    pub fn pass(&mut self, player: &PlayerId) -> Result<PlayerId, RouletteError> {
        self.ensure_turn(player)?;
        match self.state.turn {
            TurnState::AwaitingFirstAction => Err(RouletteError::MustPullFirst),
            TurnState::CanPassOrPull => self.advance(),
        }
    }

    /// Returns the player's remaining skips and the next player.
    pub fn skip(&mut self, player: &PlayerId) -> Result<(u8, PlayerId), RouletteError> {
        self.ensure_turn(player)?;
        if self.state.turn == TurnState::CanPassOrPull {
            return Err(RouletteError::AlreadyActedThisTurn);
        }

        let skips = self
            .data
            .skips
            .get_mut(player)
            .ok_or(RouletteError::InternalStateError)?;
        if *skips == 0 {
            return Err(RouletteError::NoSkipsLeft);
        }
        *skips -= 1;
        let skips_left = *skips;

        let next = self.advance()?;
        Ok((skips_left, next))
    }
}

/// The game in whichever phase it is currently in.
#[enum_dispatch(GameStateManagement)]
#[derive(Debug)]
pub enum RouletteState {
    Lobby(Game<Lobby>),
    Active(Game<Active>),
    Finished(Game<Finished>),
}

impl Default for RouletteState {
    /// An empty, already finished game. Only used as a placeholder while
    /// moving a game between phases.
    fn default() -> Self {
        Self::Finished(Game {
            data: GameData::default(),
            state: Finished {
                reason: FinishReason::Stopped,
            },
        })
    }
}

impl RouletteState {
    /// Open a lobby with `host` as the first player and a freshly spun
    /// cylinder.
    pub fn new(host: &PlayerId, settings: GameSettings) -> Self {
        Self::with_rng(host, settings, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(host: &PlayerId, settings: GameSettings, rng: &mut R) -> Self {
        let cylinder = Cylinder::spin(settings.chambers, rng);
        Self::with_cylinder(host, settings, cylinder)
    }

    pub fn with_cylinder(host: &PlayerId, settings: GameSettings, cylinder: Cylinder) -> Self {
        Self::Lobby(Game::<Lobby>::new(host, settings, cylinder))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Why the game ended, if it has.
    pub fn finish_reason(&self) -> Option<&FinishReason> {
        match self {
            Self::Finished(game) => Some(&game.state.reason),
            Self::Lobby(_) | Self::Active(_) => None,
        }
    }

    pub fn pulls_fired(&self) -> usize {
        match self {
            Self::Lobby(game) => game.data.pulls_fired(),
            Self::Active(game) => game.data.pulls_fired(),
            Self::Finished(game) => game.data.pulls_fired(),
        }
    }

    pub fn join(&mut self, player: &PlayerId) -> Result<Outcome, RouletteError> {
        match self {
            Self::Lobby(game) => {
                game.join(player)?;
                debug!("{player} joined, roster size {}", game.data.players.len());
                Ok(Outcome::Joined {
                    player: player.clone(),
                    players: game.data.players.clone(),
                })
            }
            Self::Active(_) => Err(RouletteError::AlreadyStarted),
            Self::Finished(_) => Err(RouletteError::NoActiveGame),
        }
    }

    pub fn begin(&mut self) -> Result<Outcome, RouletteError> {
        match self {
            Self::Lobby(game) => game.ensure_enough_players()?,
            Self::Active(_) => return Err(RouletteError::AlreadyStarted),
            Self::Finished(_) => return Err(RouletteError::NoActiveGame),
        }

        match std::mem::take(self) {
            Self::Lobby(game) => {
                let game = Game::<Active>::from(game);
                let first = game
                    .current_player()
                    .cloned()
                    .ok_or(RouletteError::InternalStateError)?;
                let players = game.data.players.clone();
                *self = Self::Active(game);
                debug!("game began with {} players, {first} first", players.len());
                Ok(Outcome::Began { first, players })
            }
            other => {
                *self = other;
                Err(RouletteError::InternalStateError)
            }
        }
    }

    pub fn pull(&mut self, player: &PlayerId) -> Result<Outcome, RouletteError> {
        let (trigger, fatal_odds_next_pct) = match self {
            Self::Active(game) => {
                let trigger = game.pull(player)?;
                (trigger, game.data.cylinder.fatal_odds_pct())
            }
            Self::Lobby(_) => return Err(RouletteError::NotStarted),
            Self::Finished(_) => return Err(RouletteError::NoActiveGame),
        };

        match trigger {
            Trigger::Click { remaining } => {
                debug!("{player} survived, {remaining} chambers left");
                Ok(Outcome::Survived {
                    player: player.clone(),
                    remaining_chambers: remaining,
                    fatal_odds_next_pct,
                })
            }
            Trigger::Bang | Trigger::Exhausted => {
                self.finish(FinishReason::Fatal(player.clone()));
                Ok(Outcome::Fatal {
                    player: player.clone(),
                })
            }
        }
    }

    pub fn pass(&mut self, player: &PlayerId) -> Result<Outcome, RouletteError> {
        match self {
            Self::Active(game) => {
                let next = game.pass(player)?;
                Ok(Outcome::Passed {
                    player: player.clone(),
                    next,
                })
            }
            Self::Lobby(_) => Err(RouletteError::NotStarted),
            Self::Finished(_) => Err(RouletteError::NoActiveGame),
        }
    }

    pub fn skip(&mut self, player: &PlayerId) -> Result<Outcome, RouletteError> {
        match self {
            Self::Active(game) => {
                let (skips_left, next) = game.skip(player)?;
                Ok(Outcome::Skipped {
                    player: player.clone(),
                    skips_left,
                    next,
                })
            }
            Self::Lobby(_) => Err(RouletteError::NotStarted),
            Self::Finished(_) => Err(RouletteError::NoActiveGame),
        }
    }

    /// Force the game to finish, whoever's turn it is.
    pub fn stop(&mut self) -> Result<Outcome, RouletteError> {
        if self.is_finished() {
            return Err(RouletteError::NoActiveGame);
        }
        self.finish(FinishReason::Stopped);
        Ok(Outcome::Stopped)
    }

    pub fn status(&self) -> Result<Outcome, RouletteError> {
        match self {
            Self::Active(game) => Ok(Outcome::Status(game.get_view())),
            Self::Lobby(_) => Err(RouletteError::NotStarted),
            Self::Finished(_) => Err(RouletteError::NoActiveGame),
        }
    }

    /// Apply a command issued by `player` to this game.
    ///
    /// `Create` always fails here: a game already occupies the session.
    /// Replacing a finished game is the registry's job.
    pub fn apply(&mut self, player: &PlayerId, command: Command) -> Result<Outcome, RouletteError> {
        match command {
            Command::Create => Err(RouletteError::AlreadyActive),
            Command::Join => self.join(player),
            Command::Begin => self.begin(),
            Command::Pull => self.pull(player),
            Command::Pass => self.pass(player),
            Command::Skip => self.skip(player),
            Command::Stop => self.stop(),
            Command::Status => self.status(),
            Command::Help => Ok(Outcome::Help),
        }
    }

    fn finish(&mut self, reason: FinishReason) {
        debug!("game finished: {reason}");
        *self = match std::mem::take(self) {
            Self::Lobby(game) => Self::Finished(game.into_finished(reason)),
            Self::Active(game) => Self::Finished(game.into_finished(reason)),
            Self::Finished(game) => Self::Finished(game),
        };
    }
}
