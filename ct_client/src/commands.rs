use card_tracker::{entities::TagId, table::PresentationMode};
use std::fmt;

/// Operator commands understood by the TUI and the headless loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record the current hand and start the next one.
    Commit,
    /// Empty the table without recording anything.
    Clear,
    /// Start a new session at hand 1. Needs confirmation.
    NewGame,
    /// Set the presentation mode, or toggle it when `None`.
    Mode(Option<PresentationMode>),
    /// Feed a tag in as if it was read on the keyboard channel.
    Tag(TagId),
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Mode other than `manager` or `player`.
    InvalidMode(String),
    /// `tag` without an identifier.
    TagMissingId,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(value) => write!(
                f,
                "Invalid mode '{}'. Use 'mode manager', 'mode player' or 'mode' to toggle",
                value
            ),
            Self::TagMissingId => write!(f, "Tag requires an identifier (e.g., 'tag 04A1B2')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use card_tracker::table::PresentationMode;
/// use ct_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("commit"), Ok(Command::Commit));
/// assert_eq!(parse_command("save"), Ok(Command::Commit));
/// assert_eq!(
///     parse_command("mode player"),
///     Ok(Command::Mode(Some(PresentationMode::Player)))
/// );
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "commit" | "save" => return Ok(Command::Commit),
        "clear" | "reset" => return Ok(Command::Clear),
        "new-game" => return Ok(Command::NewGame),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first().map(|cmd| cmd.to_lowercase()).as_deref() {
        Some("mode") => parse_mode_command(&parts),
        // Tag ids are case sensitive; only the keyword is lowercased.
        Some("tag") => parts
            .get(1)
            .and_then(|raw| TagId::new(raw))
            .map(Command::Tag)
            .ok_or(ParseError::TagMissingId),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a mode command: "mode [manager|player]"
fn parse_mode_command(parts: &[&str]) -> Result<Command, ParseError> {
    match parts.get(1).map(|mode| mode.to_lowercase()).as_deref() {
        None => Ok(Command::Mode(None)),
        Some("manager") => Ok(Command::Mode(Some(PresentationMode::Manager))),
        Some("player") => Ok(Command::Mode(Some(PresentationMode::Player))),
        Some(_) => Err(ParseError::InvalidMode(parts[1].to_string())),
    }
}

/// Whether an answer to a confirmation prompt means yes.
pub fn is_confirmation(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
