//! Game option sessions for Hexforge.
//!
//! This crate drives one session's options from the first edit to the
//! server's answer:
//!
//! 1. **Editing**: raw per-field input ([`OptionEdit`]) is validated
//!    against each option, every field at once, and failures are summed
//!    up per a [`ReportPolicy`]
//! 2. **Submitting**: the game name is checked, unknown options are
//!    dropped and the minimum version is negotiated, giving a
//!    [`GameCreation`] that becomes a protocol message
//! 3. **Exchange**: after the server acknowledges the game, only its
//!    updates change the options ([`OptionExchange`], [`ExchangePhase`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby / UI (above)  ← hands over edits, shows validation text
//!     ↕
//! Session Layer (this crate)  ← owns one session's option set
//!     ↕
//! Options Layer (below)  ← typed values, packing, versions
//! ```

mod edit;
mod error;
mod exchange;
mod report;
mod submit;

pub use edit::{
    EditFailure, EditInput, OptionEdit, MSG_CHOOSE_VALUE, MSG_DIGITS_ONLY,
    MSG_SINGLE_LINE,
};
pub use error::SessionError;
pub use exchange::{ExchangePhase, OptionExchange};
pub use report::{ReportPolicy, ValidationReport};
pub use submit::{
    default_practice_name, validate_game_name, GameCreation, GameDirectory,
    GameRequest, PRACTICE_GAME_NAME,
};
