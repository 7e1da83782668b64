//! # Hexforge
//!
//! Game option negotiation for networked board games.
//!
//! Before a game starts, its creator picks rule options; the server
//! records them along with the oldest client version that understands
//! them, and turns away clients that are too old. This crate ties the
//! layers together:
//!
//! - [`hexforge_protocol`]: wire lines ↔ [`Message`](hexforge_protocol::Message)
//! - [`hexforge_options`]: typed options, packing, version negotiation
//! - [`hexforge_session`]: one client's option editing and submission
//! - here: the server-side [`Lobby`], line [`dispatch`], card names, and
//!   logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use hexforge::prelude::*;
//!
//! let mut lobby = Lobby::new(LobbyConfig::default());
//! let codec = LineCodec::default();
//!
//! let replies = hexforge::dispatch::handle_line(
//!     &mut lobby,
//!     &codec,
//!     "107|alice||localhost|My Game|PL=6",
//! )?;
//! assert_eq!(replies, ["108|My Game|1108|PL=6"]);
//! # Ok::<(), HexforgeError>(())
//! ```

pub mod cards;
pub mod dispatch;
mod error;
mod lobby;
pub mod logging;

pub use error::{
    HexforgeError, LobbyError, STATUS_GAME_EXISTS, STATUS_NAME_REJECTED, STATUS_NO_SUCH_GAME,
    STATUS_OK, STATUS_REJECTED, STATUS_VERSION_TOO_OLD,
};
pub use lobby::{GameRecord, Lobby, LobbyConfig};

pub use hexforge_options;
pub use hexforge_protocol;
pub use hexforge_session;

/// Everything needed for typical use, in one import.
pub mod prelude {
    pub use crate::cards::{card_name_key, DevCard};
    pub use crate::{GameRecord, HexforgeError, Lobby, LobbyConfig, LobbyError};

    pub use hexforge_protocol::{Codec, LineCodec, Message, MessageType, ProtocolError};

    pub use hexforge_options::{
        minimum_version, pack, parse, EditorHint, GameOption, NegotiationConfig, OptionDefinition,
        OptionError, OptionKey, OptionKind, OptionRegistry, OptionSet, OptionValue, Version,
        VersionError, VersionNegotiator,
    };

    pub use hexforge_session::{
        default_practice_name, EditInput, ExchangePhase, GameCreation, GameDirectory,
        GameRequest, OptionEdit, OptionExchange, ReportPolicy, SessionError, ValidationReport,
    };
}
