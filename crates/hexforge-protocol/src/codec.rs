//! Codec trait and the line codec.
//!
//! A "codec" (coder/decoder) converts between [`Message`] values and the
//! text lines that travel on the wire. The rest of the stack only talks
//! to the [`Codec`] trait, so the framing rules live in one place.
//!
//! The wire form of a message is
//!
//! ```text
//! <TypeId><SEP><field1><SEP>...<SEP><fieldN>
//! ```
//!
//! where `SEP` is a single reserved ASCII byte (`|` by default) that may
//! never appear inside a field. A message with no fields is just its
//! type id. Producers reject forbidden characters instead of escaping
//! them, which is what makes `encode(decode(line)) == line` hold for
//! every line `encode` can produce.

use std::str::FromStr;

use crate::types::FieldValue;
use crate::{FieldKind, Message, MessageType, ProtocolError};

/// The separator byte used when none is configured.
pub const DEFAULT_SEPARATOR: u8 = b'|';

/// Characters reserved by the packed option encoding that rides inside
/// message fields. A separator may not collide with them.
const OPTION_PACKING_CHARS: &[u8] = b",=";

/// Converts messages to wire lines and back.
///
/// `Send + Sync` because the same codec is shared by every session: it
/// holds no per-connection state.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into one line (without a line terminator).
    ///
    /// # Errors
    /// Returns [`ProtocolError::ForbiddenCharacter`] if a text field
    /// contains the separator or a line break.
    fn encode(&self, message: &Message) -> Result<String, ProtocolError>;

    /// Parses one line into a message.
    ///
    /// Total over arbitrary input: every line yields either a message or
    /// a typed error.
    fn decode(&self, line: &str) -> Result<Message, ProtocolError>;

    /// The byte written between fields. Text fields must not contain it.
    fn separator(&self) -> u8;
}

// ---------------------------------------------------------------------------
// LineCodec
// ---------------------------------------------------------------------------

/// The delimited-line [`Codec`].
///
/// ## Example
///
/// ```rust
/// use hexforge_protocol::{Codec, LineCodec, Message};
///
/// let codec = LineCodec::default();
///
/// let msg = codec.decode("109|MyGame").unwrap();
/// assert_eq!(msg, Message::EndTurn { game: "MyGame".into() });
/// assert_eq!(codec.encode(&msg).unwrap(), "109|MyGame");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCodec {
    separator: u8,
}

impl LineCodec {
    /// Creates a codec with a custom separator byte.
    ///
    /// The separator must be ASCII punctuation, and must not be `-`
    /// (it starts negative integers) or one of the option packing
    /// characters `,` and `=`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidSeparator`] otherwise.
    pub fn with_separator(separator: u8) -> Result<Self, ProtocolError> {
        if !separator.is_ascii_punctuation()
            || separator == b'-'
            || OPTION_PACKING_CHARS.contains(&separator)
        {
            return Err(ProtocolError::InvalidSeparator(separator));
        }
        Ok(Self { separator })
    }

    fn sep(&self) -> char {
        char::from(self.separator)
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl Codec for LineCodec {
    fn separator(&self) -> u8 {
        self.separator
    }

    fn encode(&self, message: &Message) -> Result<String, ProtocolError> {
        let ty = message.message_type();
        let sep = self.sep();

        let mut line = ty.id.to_string();
        for (value, spec) in message.field_values().into_iter().zip(ty.fields) {
            line.push(sep);
            match value {
                FieldValue::Text(text) => {
                    if text.contains(|c: char| c == sep || c == '\n' || c == '\r') {
                        return Err(ProtocolError::ForbiddenCharacter {
                            message: ty.name,
                            field: spec.name,
                        });
                    }
                    line.push_str(text);
                }
                FieldValue::Int(n) => line.push_str(&n.to_string()),
            }
        }
        Ok(line)
    }

    fn decode(&self, line: &str) -> Result<Message, ProtocolError> {
        let sep = self.sep();
        let (head, body) = match line.split_once(sep) {
            Some((head, body)) => (head, Some(body)),
            None => (line, None),
        };

        let type_id = parse_type_id(head)?;
        let Some(ty) = MessageType::lookup(type_id) else {
            return Err(ProtocolError::UnknownMessageType {
                type_id,
                line: line.to_string(),
            });
        };

        let raw: Vec<&str> = body.map(|b| b.split(sep).collect()).unwrap_or_default();
        if raw.len() != ty.arity() {
            return Err(ProtocolError::FieldCount {
                message: ty.name,
                expected: ty.arity(),
                found: raw.len(),
            });
        }

        let fields = Fields { ty, raw };
        let message = match type_id {
            100 => Message::Status {
                status: fields.int(0)?,
                text: fields.text(1),
            },
            105 => Message::GameOptionGetDefaults {
                options: fields.text(0),
            },
            107 => Message::NewGameWithOptionsRequest {
                nickname: fields.text(0),
                password: fields.text(1),
                host: fields.text(2),
                game: fields.text(3),
                options: fields.text(4),
            },
            108 => Message::NewGameWithOptions {
                game: fields.text(0),
                minimum_version: fields.int(1)?,
                options: fields.text(2),
            },
            109 => Message::EndTurn {
                game: fields.text(0),
            },
            110 => Message::JoinGame {
                nickname: fields.text(0),
                game: fields.text(1),
                version: fields.int(2)?,
            },
            111 => Message::LeaveGame {
                nickname: fields.text(0),
                game: fields.text(1),
            },
            // Registered in the table but not wired up here: treat it like
            // any other type this build can't read.
            _ => {
                return Err(ProtocolError::UnknownMessageType {
                    type_id,
                    line: line.to_string(),
                });
            }
        };
        Ok(message)
    }
}

/// The split fields of one line, checked against its message type.
struct Fields<'a> {
    ty: &'static MessageType,
    raw: Vec<&'a str>,
}

impl Fields<'_> {
    fn raw(&self, index: usize) -> &str {
        self.raw.get(index).copied().unwrap_or_default()
    }

    fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    fn int<T: FromStr>(&self, index: usize) -> Result<T, ProtocolError> {
        let value = self.raw(index);
        // `str::parse` accepts a leading '+', which `encode` never writes.
        if value.starts_with('+') {
            return Err(self.invalid(index, value));
        }
        value.parse().map_err(|_| self.invalid(index, value))
    }

    fn invalid(&self, index: usize, value: &str) -> ProtocolError {
        let spec = self.ty.fields.get(index);
        ProtocolError::InvalidField {
            message: self.ty.name,
            field: spec.map_or("?", |s| s.name),
            kind: spec.map_or(FieldKind::Int, |s| s.kind),
            value: value.to_string(),
        }
    }
}

fn parse_type_id(head: &str) -> Result<u32, ProtocolError> {
    if head.is_empty() {
        return Err(ProtocolError::InvalidMessage("empty type id".into()));
    }
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProtocolError::InvalidMessage(format!(
            "type id {head:?} is not a number"
        )));
    }
    match head.parse::<u32>() {
        Ok(0) => Err(ProtocolError::InvalidMessage("type id 0".into())),
        Ok(id) => Ok(id),
        Err(_) => Err(ProtocolError::InvalidMessage(format!(
            "type id {head:?} is out of range"
        ))),
    }
}

/// Encodes with the default [`LineCodec`].
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    LineCodec::default().encode(message)
}

/// Decodes with the default [`LineCodec`].
pub fn decode(line: &str) -> Result<Message, ProtocolError> {
    LineCodec::default().decode(line)
}

/// `true` if `text` can travel inside a field and inside a packed option
/// list: one line, no control characters, no `|` and no `,`.
///
/// Used for game names and string option values.
pub fn is_single_line_and_safe(text: &str) -> bool {
    !text.chars().any(|c| {
        c.is_control() || c == char::from(DEFAULT_SEPARATOR) || c == ','
    })
}

// =========================================================================
// Tests
// =========================================================================
