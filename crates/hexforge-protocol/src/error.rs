//! Error types for the protocol layer.
//!
//! Every failure here is recoverable. A bad line never takes the
//! process down: the caller gets a typed error naming what was wrong
//! and decides whether to drop the line or report it.

use crate::FieldKind;

/// Errors that can occur while encoding or decoding a wire line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The line has no usable type id (empty, non-numeric, zero, or
    /// too large).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The type id is well-formed but not in this build's table.
    ///
    /// Non-fatal: newer peers may send types we don't know yet. The raw
    /// line is kept so it can be logged or forwarded untouched.
    #[error("unknown message type {type_id}")]
    UnknownMessageType { type_id: u32, line: String },

    /// The line carries the wrong number of fields for its type.
    #[error("{message}: expected {expected} fields, found {found}")]
    FieldCount {
        message: &'static str,
        expected: usize,
        found: usize,
    },

    /// A field failed to parse as its declared primitive type.
    #[error("{message}: field `{field}` is not a valid {kind}: {value:?}")]
    InvalidField {
        message: &'static str,
        field: &'static str,
        kind: FieldKind,
        value: String,
    },

    /// A text field contains the separator byte or a line break, so it
    /// cannot be written without corrupting the line.
    #[error("{message}: field `{field}` contains a reserved character")]
    ForbiddenCharacter {
        message: &'static str,
        field: &'static str,
    },

    /// The codec was configured with an unusable separator byte.
    #[error("unusable separator byte 0x{0:02x}")]
    InvalidSeparator(u8),
}

impl ProtocolError {
    /// `true` for malformed lines (bad id, wrong arity, bad field).
    ///
    /// Unknown message types are deliberately not parse failures.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidMessage(_)
                | Self::FieldCount { .. }
                | Self::InvalidField { .. }
        )
    }

    /// The offending field, when the error is about one field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. }
            | Self::ForbiddenCharacter { field, .. } => Some(field),
            _ => None,
        }
    }
}
