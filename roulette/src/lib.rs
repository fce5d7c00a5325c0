//! # Roulette
//!
//! A turn-based multiplayer Russian roulette game for chat rooms, built as a
//! type-safe finite state machine (FSM) behind a per-session actor registry.
//!
//! ## Architecture
//!
//! A game moves through three phases:
//!
//! - **Lobby**: The host opened the game; other players join
//! - **Active**: Players take turns pulling the trigger on a shared
//!   six-chamber cylinder holding one hidden bullet
//! - **Finished**: Someone was shot or the game was stopped
//!
//! Within a turn the acting player may pull any number of times. After at
//! least one survived pull they may pass the turn on; before pulling they
//! may instead spend one of their limited skips.
//!
//! ## Core Modules
//!
//! - [`game`]: Game state machine, entities, and turn rules
//! - [`session`]: Concurrency-safe registry of one game per chat room
//!
//! ## Example
//!
//! ```
//! use roulette::{GameSettings, RouletteState};
//! use roulette::game::entities::PlayerId;
//!
//! let alice = PlayerId::new("alice");
//! let mut game = RouletteState::new(&alice, GameSettings::default());
//! game.join(&PlayerId::new("bob")).unwrap();
//! game.begin().unwrap();
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameSettings, GameStateManagement, Outcome, RouletteError, RouletteState,
    constants::{self, CHAMBER_COUNT, DEFAULT_SKIPS_PER_PLAYER, MIN_PLAYERS},
    entities,
};

/// Per-session actors and the registry that owns them.
pub mod session;
