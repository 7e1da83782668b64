//! Core protocol types for Hexforge's wire format.
//!
//! Every request or event that travels between a client and the server
//! is one [`Message`]. Each message variant has a fixed entry in the
//! [`MessageType`] table: a numeric id, a name, and the ordered list of
//! fields it carries on the wire.
//!
//! The table is additive-only. New message types get new ids; existing
//! ids are never renumbered or reused, so an older peer can always tell
//! "a message I don't know" apart from "a message I know but is broken".

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field descriptions
// ---------------------------------------------------------------------------

/// The primitive type of a single wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text. Must not contain the separator byte or a line break.
    Text,
    /// A signed decimal integer.
    Int,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Int => write!(f, "integer"),
        }
    }
}

/// One named, typed field of a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used in parse errors.
    pub name: &'static str,
    /// Primitive type the field must parse as.
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text,
    }
}

const fn int(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Int,
    }
}

// ---------------------------------------------------------------------------
// MessageType: the registry
// ---------------------------------------------------------------------------

/// An immutable registry entry describing one kind of wire message.
///
/// The arity of a message is simply the length of [`fields`](Self::fields);
/// a line with any other number of fields is rejected during decode.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageType {
    /// Numeric id written at the start of every line.
    pub id: u32,
    /// Human-readable name, used in logs and errors.
    pub name: &'static str,
    /// The fields this message carries, in wire order.
    pub fields: &'static [FieldSpec],
}

impl MessageType {
    /// Server → client status text. `status` is a numeric status code.
    pub const STATUS: MessageType = MessageType {
        id: 100,
        name: "Status",
        fields: &[int("status"), text("text")],
    };

    /// Client asks for the server's option defaults; the server answers
    /// with the same type carrying its packed defaults.
    pub const GAME_OPTION_GET_DEFAULTS: MessageType = MessageType {
        id: 105,
        name: "GameOptionGetDefaults",
        fields: &[text("options")],
    };

    /// Client → server: create a new game with these packed options.
    pub const NEW_GAME_WITH_OPTIONS_REQUEST: MessageType = MessageType {
        id: 107,
        name: "NewGameWithOptionsRequest",
        fields: &[
            text("nickname"),
            text("password"),
            text("host"),
            text("game"),
            text("options"),
        ],
    };

    /// Server → clients: a game exists with these options.
    pub const NEW_GAME_WITH_OPTIONS: MessageType = MessageType {
        id: 108,
        name: "NewGameWithOptions",
        fields: &[text("game"), int("minimum_version"), text("options")],
    };

    /// A player ends their turn.
    pub const END_TURN: MessageType = MessageType {
        id: 109,
        name: "EndTurn",
        fields: &[text("game")],
    };

    /// Client → server: join an existing game.
    pub const JOIN_GAME: MessageType = MessageType {
        id: 110,
        name: "JoinGame",
        fields: &[text("nickname"), text("game"), int("version")],
    };

    /// Client → server: leave a game.
    pub const LEAVE_GAME: MessageType = MessageType {
        id: 111,
        name: "LeaveGame",
        fields: &[text("nickname"), text("game")],
    };

    /// Every message type this build understands.
    pub const ALL: &'static [MessageType] = &[
        Self::STATUS,
        Self::GAME_OPTION_GET_DEFAULTS,
        Self::NEW_GAME_WITH_OPTIONS_REQUEST,
        Self::NEW_GAME_WITH_OPTIONS,
        Self::END_TURN,
        Self::JOIN_GAME,
        Self::LEAVE_GAME,
    ];

    /// Finds the registry entry for a numeric id.
    ///
    /// Returns `None` for ids this build doesn't know, which is normal
    /// when talking to a newer peer.
    pub fn lookup(id: u32) -> Option<&'static MessageType> {
        Self::ALL.iter().find(|t| t.id == id)
    }

    /// Number of fields a line of this type carries.
    pub const fn arity(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A decoded protocol message.
///
/// Each variant corresponds to exactly one [`MessageType`] and carries
/// that type's fields with their native Rust types. Packed option
/// strings (`options` fields) are kept opaque here: the options layer
/// knows how to read them, the protocol layer only moves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Status code plus human-readable text.
    Status { status: i32, text: String },

    /// Request (client) or answer (server) for the option defaults.
    GameOptionGetDefaults { options: String },

    /// Request to create a game with the given packed options.
    NewGameWithOptionsRequest {
        nickname: String,
        password: String,
        host: String,
        game: String,
        options: String,
    },

    /// Announcement of a game and its options.
    /// `minimum_version` is `-1` when the options impose no floor.
    NewGameWithOptions {
        game: String,
        minimum_version: i32,
        options: String,
    },

    /// The current player ended their turn in `game`.
    EndTurn { game: String },

    /// Request to join `game`, sent with the client's version.
    JoinGame {
        nickname: String,
        game: String,
        version: u32,
    },

    /// `nickname` leaves `game`.
    LeaveGame { nickname: String, game: String },
}

/// A borrowed view of one field value, used while encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
}

impl Message {
    /// Returns the registry entry for this message.
    pub fn message_type(&self) -> &'static MessageType {
        match self {
            Self::Status { .. } => &MessageType::STATUS,
            Self::GameOptionGetDefaults { .. } => {
                &MessageType::GAME_OPTION_GET_DEFAULTS
            }
            Self::NewGameWithOptionsRequest { .. } => {
                &MessageType::NEW_GAME_WITH_OPTIONS_REQUEST
            }
            Self::NewGameWithOptions { .. } => {
                &MessageType::NEW_GAME_WITH_OPTIONS
            }
            Self::EndTurn { .. } => &MessageType::END_TURN,
            Self::JoinGame { .. } => &MessageType::JOIN_GAME,
            Self::LeaveGame { .. } => &MessageType::LEAVE_GAME,
        }
    }

    /// The game this message is about, if it is game-scoped.
    pub fn game(&self) -> Option<&str> {
        match self {
            Self::NewGameWithOptionsRequest { game, .. }
            | Self::NewGameWithOptions { game, .. }
            | Self::EndTurn { game }
            | Self::JoinGame { game, .. }
            | Self::LeaveGame { game, .. } => Some(game.as_str()),
            Self::Status { .. } | Self::GameOptionGetDefaults { .. } => None,
        }
    }

    /// Field values in wire order. Always matches `message_type().fields`.
    pub(crate) fn field_values(&self) -> Vec<FieldValue<'_>> {
        use FieldValue::{Int, Text};

        match self {
            Self::Status { status, text } => {
                vec![Int(i64::from(*status)), Text(text)]
            }
            Self::GameOptionGetDefaults { options } => vec![Text(options)],
            Self::NewGameWithOptionsRequest {
                nickname,
                password,
                host,
                game,
                options,
            } => vec![
                Text(nickname),
                Text(password),
                Text(host),
                Text(game),
                Text(options),
            ],
            Self::NewGameWithOptions {
                game,
                minimum_version,
                options,
            } => vec![
                Text(game),
                Int(i64::from(*minimum_version)),
                Text(options),
            ],
            Self::EndTurn { game } => vec![Text(game)],
            Self::JoinGame {
                nickname,
                game,
                version,
            } => vec![Text(nickname), Text(game), Int(i64::from(*version))],
            Self::LeaveGame { nickname, game } => {
                vec![Text(nickname), Text(game)]
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndTurn { game } => write!(f, "EndTurn:game={game}"),
            other => write!(f, "{}", other.message_type().name),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
