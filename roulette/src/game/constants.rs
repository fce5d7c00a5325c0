/// Revolver capacity used unless a game is configured otherwise.
pub const CHAMBER_COUNT: usize = 6;

/// Skips each player may spend over the course of one game.
pub const DEFAULT_SKIPS_PER_PLAYER: u8 = 2;

/// Smallest roster allowed to begin a game.
pub const MIN_PLAYERS: usize = 2;
