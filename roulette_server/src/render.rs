//! Chat-facing text for outcomes and errors.

use roulette::{
    Outcome, RouletteError,
    entities::{Command, GameView, Phase, PlayerId},
};

fn mention(player: &PlayerId) -> String {
    format!("@{player}")
}

fn roster(players: &[PlayerId]) -> String {
    players
        .iter()
        .map(PlayerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe(command: Command) -> &'static str {
    match command {
        Command::Create => "Start a new game of Russian Roulette",
        Command::Join => "Join the current game",
        Command::Begin => "Start the game with the current players",
        Command::Pull => "Pull the trigger on your turn",
        Command::Pass => "Pass the gun to the next player (after pulling at least once)",
        Command::Skip => "Skip your turn (limited uses)",
        Command::Stop => "Stop the current game",
        Command::Status => "Show the game status",
        Command::Help => "Show this message",
    }
}

/// The help message listing every command.
pub fn help_text() -> String {
    let mut text = String::from("🎯 Russian Roulette Bot Commands:\n");
    for command in Command::ALL {
        text.push_str(&format!("\n/{command} - {}", describe(command)));
    }
    text
}

fn render_status(view: &GameView) -> String {
    let mut lines = vec![format!("Game phase: {}", view.phase)];

    lines.push("Players:".to_string());
    for standing in &view.players {
        lines.push(format!(
            "  {} ({} skips left)",
            mention(&standing.player),
            standing.skips_left
        ));
    }

    if view.phase == Phase::Active {
        lines.push(format!("Chambers left: {}", view.chambers_left));
        if let Some(current) = &view.current_player {
            lines.push(format!("Waiting for: {}", mention(current)));
        }
    }

    lines.join("\n")
}

/// Render a successful outcome as the messages to post, in order.
pub fn render_outcome(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Created { host } => vec![format!(
            "🎮 {} started a game of Russian Roulette!\n\
             Use /join to join the game.\n\
             Use /startgame when all players have joined.",
            mention(host)
        )],
        Outcome::Joined { player, players } => vec![format!(
            "{} joined the game! Current players: {}",
            mention(player),
            roster(players)
        )],
        Outcome::Began { first, .. } => vec![
            "🎲 Game starting! Use /pull to take your turn.".to_string(),
            format!("First up: {}", mention(first)),
        ],
        Outcome::Survived {
            player,
            remaining_chambers,
            fatal_odds_next_pct,
        } => vec![
            format!(
                "*click* {} survives!\n\
                 Chambers left: {remaining_chambers}\n\
                 Chance of next shot being fatal: {fatal_odds_next_pct:.1}%",
                mention(player)
            ),
            "Use /pull to go again or /pass to hand over the gun.".to_string(),
        ],
        Outcome::Fatal { player } => {
            vec![format!("💥 BANG! {} is dead! Game Over!", mention(player))]
        }
        Outcome::Passed { next, .. } => vec![format!("Next up: {}", mention(next))],
        Outcome::Skipped {
            player,
            skips_left,
            next,
        } => vec![
            format!(
                "{} skips their turn ({skips_left} skips left).",
                mention(player)
            ),
            format!("Next up: {}", mention(next)),
        ],
        Outcome::Stopped => vec!["Game stopped.".to_string()],
        Outcome::Status(view) => vec![render_status(view)],
        Outcome::Help => vec![help_text()],
    }
}

/// Render a game-level error as a single reply.
///
/// The command is only used to pick a friendlier wording where the same
/// error reads differently depending on what was attempted.
pub fn render_error(error: &RouletteError, command: Command) -> String {
    match error {
        RouletteError::AlreadyActive => "A game is already in progress!".to_string(),
        RouletteError::NoActiveGame if command == Command::Stop => {
            "No active game to stop!".to_string()
        }
        RouletteError::NoActiveGame => {
            "No active game! Use /startroulette to start a new game.".to_string()
        }
        RouletteError::DuplicatePlayer { .. } => "You're already in the game!".to_string(),
        RouletteError::InsufficientPlayers { required, .. } => {
            format!("Need at least {required} players to start!")
        }
        RouletteError::NotYourTurn { expected } => format!(
            "It's not your turn! Waiting for {} to pull the trigger.",
            mention(expected)
        ),
        RouletteError::MustPullFirst => {
            "You have to pull the trigger at least once before you can /pass.".to_string()
        }
        RouletteError::AlreadyActedThisTurn => {
            "You already pulled this turn. Use /pull again or /pass.".to_string()
        }
        RouletteError::NoSkipsLeft => "You have no skips left! Use /pull.".to_string(),
        RouletteError::NotStarted => {
            "The game hasn't started yet! Use /startgame once everyone has joined.".to_string()
        }
        RouletteError::AlreadyStarted => "The game has already started!".to_string(),
        RouletteError::InternalStateError => {
            "Something went wrong with this game. Use /stopgame and start a new one.".to_string()
        }
    }
}
