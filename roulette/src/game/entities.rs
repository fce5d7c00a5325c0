use log::error;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

use super::constants::CHAMBER_COUNT;

/// Opaque identifier of a player within a session.
///
/// The transport shell decides what goes in here (a handle, a display
/// name, a synthesized id); the engine only compares them for equality.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Commands a player can issue in a session.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Open a new game lobby with the issuer as the first player.
    Create,
    Join,
    /// Close the lobby and start taking turns.
    Begin,
    Pull,
    Pass,
    Skip,
    Stop,
    Status,
    Help,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Self::Create,
        Self::Join,
        Self::Begin,
        Self::Pull,
        Self::Pass,
        Self::Skip,
        Self::Stop,
        Self::Status,
        Self::Help,
    ];
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Create => "create",
            Self::Join => "join",
            Self::Begin => "begin",
            Self::Pull => "pull",
            Self::Pass => "pass",
            Self::Skip => "skip",
            Self::Stop => "stop",
            Self::Status => "status",
            Self::Help => "help",
        };
        write!(f, "{repr}")
    }
}

/// Result of pulling the trigger once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trigger {
    /// Empty chamber. `remaining` chambers are left in the cylinder.
    Click { remaining: usize },
    /// The chamber under the hammer held the bullet.
    Bang,
    /// The cylinder ran out of chambers without ever reaching the bullet.
    /// Only possible if the cylinder's counters are corrupt.
    Exhausted,
}

/// A revolver cylinder with exactly one loaded chamber.
///
/// The cylinder is shared by every player for the lifetime of a game and
/// is never re-spun, so the odds of the next pull only ever get worse.
#[derive(Clone, Debug)]
pub struct Cylinder {
    chambers: usize,
    /// Index of the loaded chamber. Never exposed through views.
    bullet: usize,
    fired: usize,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::with_bullet(CHAMBER_COUNT, 0)
    }
}

impl Cylinder {
    /// Load a cylinder with the bullet drawn uniformly from `[0, chambers)`.
    pub fn spin<R: Rng + ?Sized>(chambers: usize, rng: &mut R) -> Self {
        let bullet = rng.random_range(0..chambers.max(1));
        Self::with_bullet(chambers, bullet)
    }

    /// Load a cylinder with a known bullet position. Out-of-range positions
    /// are wrapped into the cylinder.
    pub fn with_bullet(chambers: usize, bullet: usize) -> Self {
        let chambers = chambers.max(1);
        Self {
            chambers,
            bullet: bullet % chambers,
            fired: 0,
        }
    }

    pub fn fired(&self) -> usize {
        self.fired
    }

    #[cfg(test)]
    pub(crate) fn bullet(&self) -> usize {
        self.bullet
    }

    pub fn remaining(&self) -> usize {
        self.chambers - self.fired
    }

    /// Pull the trigger.
    ///
    /// A click advances the cylinder by one chamber; a bang leaves it where
    /// it is, since the game is over at that point anyway.
    pub fn trigger(&mut self) -> Trigger {
        if self.fired == self.bullet {
            return Trigger::Bang;
        }

        if self.fired + 1 == self.chambers {
            // bullet < chambers and every earlier chamber was empty, so the
            // last chamber must have been the loaded one.
            error!(
                "cylinder exhausted: fired {} of {} chambers without reaching bullet",
                self.fired, self.chambers
            );
            debug_assert!(
                self.fired + 1 < self.chambers,
                "cylinder exhausted without reaching the bullet"
            );
            return Trigger::Exhausted;
        }

        self.fired += 1;
        Trigger::Click {
            remaining: self.remaining(),
        }
    }

    /// Percent chance that the next pull is fatal, given no bullet has
    /// been hit so far.
    pub fn fatal_odds_pct(&self) -> f64 {
        100.0 / self.remaining() as f64
    }
}

/// Progress of the current player within their turn.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum TurnState {
    /// Nothing done yet. The player may pull or skip.
    #[default]
    AwaitingFirstAction,
    /// At least one pull survived. The player may pull again or pass.
    CanPassOrPull,
}

/// Why a game ended.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FinishReason {
    Fatal(PlayerId),
    Stopped,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal(player) => write!(f, "{player} was shot"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Active,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Active => "active",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// A player as seen by everyone in the room.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerStanding {
    pub player: PlayerId,
    pub skips_left: u8,
}

/// Public snapshot of a game. Deliberately carries no bullet position.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub phase: Phase,
    pub players: Vec<PlayerStanding>,
    /// Whose turn it is. Only set while the game is active.
    pub current_player: Option<PlayerId>,
    pub pulls_fired: usize,
    pub chambers_left: usize,
}
