//! Chat command parsing and sender identity resolution.

use roulette::entities::{Command, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace (or a bare slash).
    #[error("Empty command. Type /help to see available commands")]
    Empty,
    /// Unrecognized command.
    #[error("Unrecognized command '{0}'. Type /help to see available commands")]
    UnrecognizedCommand(String),
}

/// Parse a chat message into a Command.
///
/// Only the first word counts. A leading `/` and a trailing `@botname`
/// mention are optional, and matching ignores case. The long names used by
/// the classic bot (`/startroulette`, `/startgame`, `/stopgame`) are
/// accepted as aliases.
///
/// # Arguments
///
/// * `input` - The raw message text
///
/// # Returns
///
/// * `Ok(Command)` - Successfully parsed command
/// * `Err(ParseError)` - Parse error with descriptive message
///
/// # Examples
///
/// ```
/// use roulette::entities::Command;
/// use roulette_server::commands::parse_command;
///
/// assert_eq!(parse_command("/pull"), Ok(Command::Pull));
/// assert_eq!(parse_command("/startroulette@RouletteBot"), Ok(Command::Create));
/// assert_eq!(parse_command("PASS"), Ok(Command::Pass));
/// assert!(parse_command("/dance").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let word = input.split_ascii_whitespace().next().unwrap_or_default();
    let word = word.strip_prefix('/').unwrap_or(word);
    let name = word.split('@').next().unwrap_or_default().to_ascii_lowercase();

    match name.as_str() {
        "" => Err(ParseError::Empty),
        "create" | "new" | "startroulette" => Ok(Command::Create),
        "join" => Ok(Command::Join),
        "begin" | "start" | "startgame" => Ok(Command::Begin),
        "pull" | "shoot" => Ok(Command::Pull),
        "pass" => Ok(Command::Pass),
        "skip" => Ok(Command::Skip),
        "stop" | "stopgame" => Ok(Command::Stop),
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        _ => Err(ParseError::UnrecognizedCommand(word.to_string())),
    }
}

/// The author of a chat message, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Numeric account id. Always present.
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl Sender {
    /// Resolve the identity used inside the game: the handle if set, else
    /// the first name, else a name synthesized from the account id.
    pub fn player_id(&self) -> PlayerId {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PlayerId::new)
        };

        non_empty(&self.username)
            .or_else(|| non_empty(&self.first_name))
            .unwrap_or_else(|| PlayerId::new(&format!("player{}", self.id)))
    }
}
