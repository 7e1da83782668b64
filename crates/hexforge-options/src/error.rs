//! Error types for the options layer.
//!
//! Two enums live here. [`OptionError`] covers definitions, values and
//! the packed wire form; [`VersionError`] is the negotiation outcome
//! that a caller has to show to a person before going ahead.
//!
//! Every error that comes out of a setter means the option kept its
//! previous value.

use crate::{OptionKey, Version};

/// Errors from option definitions, option values and option lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// The key is empty, too long, or has characters outside `A-Za-z0-9_`.
    #[error("invalid option key {0:?}")]
    InvalidKey(String),

    /// A definition's constraints contradict each other.
    #[error("option {key}: invalid definition: {reason}")]
    InvalidDefinition { key: OptionKey, reason: String },

    /// The same key appears twice in a registry or an option list.
    #[error("duplicate option {0}")]
    Duplicate(OptionKey),

    /// An integer or enum write outside the allowed bounds.
    #[error("option {key}: {value} is out of range {min}..={max}")]
    OutOfRange {
        key: OptionKey,
        value: i64,
        min: i32,
        max: i32,
    },

    /// A string write containing a line break, control character, or a
    /// reserved separator.
    #[error("option {key}: text must be a single line without '|' or ','")]
    InvalidText { key: OptionKey },

    /// The write doesn't fit the option's declared type.
    #[error("option {key} is not a {expected} option")]
    TypeMismatch {
        key: OptionKey,
        expected: &'static str,
    },

    /// The option's key isn't in the local registry, so its value can
    /// only be carried, never edited.
    #[error("option {0} is not known to this version")]
    UnknownOption(OptionKey),

    /// A packed option value that doesn't parse for its type.
    #[error("option {key}: invalid value {value:?}")]
    InvalidValue { key: OptionKey, value: String },

    /// A packed option list that isn't made of `key=value` records.
    #[error("malformed option list: {0}")]
    Malformed(String),

    /// Option definitions that aren't valid JSON for the registry.
    #[cfg(feature = "json")]
    #[error("invalid option definitions: {0}")]
    Json(String),
}

impl OptionError {
    /// The option this error is about, if any.
    pub fn key(&self) -> Option<&OptionKey> {
        match self {
            Self::InvalidDefinition { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::InvalidText { key }
            | Self::TypeMismatch { key, .. }
            | Self::InvalidValue { key, .. } => Some(key),
            Self::Duplicate(key) | Self::UnknownOption(key) => Some(key),
            _ => None,
        }
    }
}

/// Errors from version negotiation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The options need a newer version than `actual`.
    ///
    /// At game creation this asks for an explicit confirmation; when a
    /// client joins it means the client can't play this game.
    #[error(
        "version {required} or higher is required for these game options \
         (have {actual}); older clients won't be able to join"
    )]
    VersionTooOld { required: Version, actual: Version },
}

impl VersionError {
    /// The minimum version the options need.
    pub fn required(&self) -> Version {
        match self {
            Self::VersionTooOld { required, .. } => *required,
        }
    }
}
