//! Game creation: the request a person fills in and what comes out of it.

use std::collections::{BTreeSet, HashSet};

use hexforge_options::Version;
use hexforge_protocol::{is_single_line_and_safe, Message};

use crate::SessionError;

/// Name given to the first practice game of a client.
pub const PRACTICE_GAME_NAME: &str = "Practice";

/// Default name for a new practice game, given how many practice games
/// this client has already started: `"Practice"`, then `"Practice 2"`,
/// `"Practice 3"`...
pub fn default_practice_name(started: u32) -> String {
    match started {
        0 => PRACTICE_GAME_NAME.to_owned(),
        n => format!("{PRACTICE_GAME_NAME} {}", n.saturating_add(1)),
    }
}

/// Trims a game name and checks it can be sent and shown.
///
/// # Errors
/// [`SessionError::InvalidGameName`] for an empty name, or one with a
/// line break, control character, `|` or `,`.
pub fn validate_game_name(name: &str) -> Result<String, SessionError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || !is_single_line_and_safe(trimmed) {
        return Err(SessionError::InvalidGameName(name.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// Where existing game names are looked up before creating a new one.
pub trait GameDirectory {
    fn game_exists(&self, name: &str) -> bool;
}

impl GameDirectory for HashSet<String> {
    fn game_exists(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl GameDirectory for BTreeSet<String> {
    fn game_exists(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<T: GameDirectory + ?Sized> GameDirectory for &T {
    fn game_exists(&self, name: &str) -> bool {
        (**self).game_exists(name)
    }
}

/// What the person filled in besides the options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRequest {
    pub nickname: String,
    pub password: String,
    pub host: String,
    pub game: String,
    /// Set after the person has agreed that older clients won't be able
    /// to join.
    pub confirmed: bool,
}

/// A validated game, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCreation {
    pub nickname: String,
    pub password: String,
    pub host: String,
    /// Trimmed game name.
    pub game: String,
    /// Oldest version that can join, `None` if any can.
    pub minimum_version: Option<Version>,
    /// Packed options, unknown options already removed.
    pub options: String,
}

impl From<GameCreation> for Message {
    fn from(creation: GameCreation) -> Self {
        Message::NewGameWithOptionsRequest {
            nickname: creation.nickname,
            password: creation.password,
            host: creation.host,
            game: creation.game,
            options: creation.options,
        }
    }
}
