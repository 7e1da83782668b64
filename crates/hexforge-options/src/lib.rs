//! Game options for Hexforge.
//!
//! Before a game starts, its creator picks rule options (player count,
//! victory points, scenario...). This crate holds what those options are
//! and how they move between peers:
//!
//! 1. **Definitions** ([`OptionDefinition`], [`OptionKind`]) and the
//!    [`OptionRegistry`] of every option this build knows
//! 2. **Values** ([`GameOption`], [`OptionSet`]): one game's settings,
//!    including options from newer peers that this build can only carry
//! 3. **Packing** ([`pack`], [`parse`]): the `key=value,...` text form
//!    sent inside protocol messages
//! 4. **Versions** ([`Version`], [`minimum_version`],
//!    [`VersionNegotiator`]): which clients can play with a set of options
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (above)  ← edits and submits option sets
//!     ↕
//! Options Layer (this crate)  ← typed values, packing, versions
//!     ↕
//! Protocol Layer (below)  ← carries packed option lists as text fields
//! ```

mod definition;
mod error;
mod pack;
mod registry;
mod set;
mod value;
mod version;

pub use definition::{
    int_field_width, EditorHint, OptionDefinition, OptionKey, OptionKind, OptionType,
    INT_CHOICE_MAX_RANGE, MAX_KEY_LEN, MAX_TEXT_FIELD_WIDTH, PLACEHOLDER,
};
pub use error::{OptionError, VersionError};
pub use pack::{pack, parse, EMPTY_PACKED};
pub use registry::{OptionRegistry, SC_PIRI};
pub use set::OptionSet;
pub use value::{GameOption, OptionValue};
pub use version::{
    check_participant, minimum_version, NegotiationConfig, Version, VersionNegotiator,
};
