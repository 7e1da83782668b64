//! Error types for the session layer.

use hexforge_options::{OptionError, VersionError};

use crate::{ExchangePhase, ValidationReport};

/// Errors from editing, submitting or updating a session's options.
///
/// None of these change the exchange's phase. Option values that failed
/// to validate keep what they held before.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// One or more edits didn't validate. The report says which, per the
    /// exchange's [`ReportPolicy`](crate::ReportPolicy).
    #[error("{}", .0.message)]
    Validation(ValidationReport),

    /// The operation isn't allowed in the exchange's current phase.
    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: ExchangePhase,
    },

    /// This exchange only displays an existing game's options.
    #[error("options of an existing game are read-only")]
    ReadOnly,

    /// The game name is empty or contains a reserved character.
    #[error("invalid game name {0:?}")]
    InvalidGameName(String),

    /// A game with this name already exists.
    #[error("a game named {0:?} already exists")]
    GameExists(String),

    /// The options need a newer version and the requester hasn't
    /// confirmed yet.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// A remote option list didn't parse.
    #[error(transparent)]
    Option(#[from] OptionError),
}
