//! Error types for the facade: lobby errors and the unified error.

use hexforge_options::{OptionError, VersionError};
use hexforge_protocol::ProtocolError;
use hexforge_session::SessionError;

/// Status code for a reply that reports success.
pub const STATUS_OK: i32 = 0;
/// The requested game name can't be used.
pub const STATUS_NAME_REJECTED: i32 = 1;
/// A game with the requested name already exists.
pub const STATUS_GAME_EXISTS: i32 = 2;
/// The client is too old for the game's options.
pub const STATUS_VERSION_TOO_OLD: i32 = 3;
/// The named game doesn't exist.
pub const STATUS_NO_SUCH_GAME: i32 = 4;
/// The request was well-formed but can't be served.
pub const STATUS_REJECTED: i32 = 5;

/// Errors from handling one message in the lobby.
///
/// Each maps to a status code, so a rejected request can always be
/// answered with a `Status` message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("game name {0:?} is not allowed")]
    InvalidGameName(String),

    #[error("a game named {0:?} already exists")]
    GameExists(String),

    #[error("no game named {0:?}")]
    NoSuchGame(String),

    #[error("{nickname} is not in game {game:?}")]
    NotAMember { nickname: String, game: String },

    /// The lobby already holds its configured maximum of games.
    #[error("the server can't host more than {0} games")]
    Full(usize),

    /// A client sent a message only servers send.
    #[error("unexpected {0} message from a client")]
    Unexpected(&'static str),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

impl LobbyError {
    /// The status code reported to the client for this error.
    pub fn status_code(&self) -> i32 {
        match self {
            Self::InvalidGameName(_) => STATUS_NAME_REJECTED,
            Self::GameExists(_) => STATUS_GAME_EXISTS,
            Self::NoSuchGame(_) | Self::NotAMember { .. } => STATUS_NO_SUCH_GAME,
            Self::Version(_) => STATUS_VERSION_TOO_OLD,
            Self::Full(_) | Self::Unexpected(_) | Self::Option(_) => STATUS_REJECTED,
        }
    }
}

/// Top-level error that wraps all crate-specific errors.
///
/// With `?`, errors from any layer convert into this one.
#[derive(Debug, thiserror::Error)]
pub enum HexforgeError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A global tracing subscriber was already installed.
    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
