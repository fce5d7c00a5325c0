//! Russian roulette game engine - core FSM and turn rules.
//!
//! This module provides the per-session game implementation including:
//! - Type-safe finite state machine with lobby, active and finished phases
//! - Roster management with per-player skip allowances
//! - The shared revolver cylinder and its single hidden bullet
//! - Turn ordering and the pull/pass/skip transition rules

pub mod constants;
pub mod entities;
pub mod state_machine;
pub mod states;

pub use state_machine::{
    Game, GameData, GameSettings, GameStateManagement, Outcome, RouletteError, RouletteState,
};
