//! Wire protocol for Hexforge.
//!
//! This crate defines the lines that clients and servers exchange:
//!
//! - **Types** ([`MessageType`], [`Message`], [`FieldKind`]): the closed,
//!   additive-only table of message types and their decoded form.
//! - **Codec** ([`Codec`] trait, [`LineCodec`]): how messages become
//!   delimited text lines and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about game options or sessions.
//! Option lists travel inside messages as opaque packed strings; the
//! options crate reads and writes them.
//!
//! ```text
//! Transport (lines) → Protocol (Message) → Session (option exchange)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{
    decode, encode, is_single_line_and_safe, Codec, LineCodec,
    DEFAULT_SEPARATOR,
};
pub use error::ProtocolError;
pub use types::{FieldKind, FieldSpec, Message, MessageType};
