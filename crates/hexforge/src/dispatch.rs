//! Line dispatch: one received line in, the reply lines out.
//!
//! The flow per line is:
//!   1. Decode → drop unknown message types with a notice
//!   2. Hand the message to the [`Lobby`]
//!   3. Encode the replies, or a `Status` line if the lobby rejected it

use hexforge_protocol::{Codec, Message, ProtocolError};

use crate::{HexforgeError, LobbyError, Lobby};

/// Handles one line received from a client.
///
/// Returns the lines to send back, possibly none. A message type this
/// build doesn't know is logged and dropped, since newer clients may
/// send it.
///
/// # Errors
/// [`HexforgeError::Protocol`] when the line doesn't decode, or a reply
/// can't be encoded. Lobby rejections are not errors: they are answered
/// with a `Status` line.
pub fn handle_line<C>(lobby: &mut Lobby, codec: &C, line: &str) -> Result<Vec<String>, HexforgeError>
where
    C: Codec + ?Sized,
{
    let message = match codec.decode(line) {
        Ok(message) => message,
        Err(ProtocolError::UnknownMessageType { type_id, .. }) => {
            tracing::info!(type_id, "dropping message of unknown type");
            return Ok(Vec::new());
        }
        Err(e) => {
            tracing::debug!(error = %e, "failed to decode line");
            return Err(e.into());
        }
    };

    let replies = match lobby.handle(message) {
        Ok(replies) => replies,
        Err(e) => {
            tracing::info!(error = %e, "request rejected");
            vec![status_reply(&e, codec.separator())]
        }
    };

    replies
        .iter()
        .map(|reply| codec.encode(reply).map_err(HexforgeError::from))
        .collect()
}

/// The `Status` message answering a rejected request.
///
/// `separator` is the byte the reply will be framed with; it is blanked
/// out of the text along with control characters.
pub fn status_reply(error: &LobbyError, separator: u8) -> Message {
    let separator = char::from(separator);
    let text = error
        .to_string()
        .replace(|c: char| c.is_control() || c == separator, " ");
    Message::Status {
        status: error.status_code(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use hexforge_protocol::LineCodec;

    use super::*;
    use crate::{LobbyConfig, STATUS_NO_SUCH_GAME};

    fn lobby() -> Lobby {
        Lobby::new(LobbyConfig::default())
    }

    #[test]
    fn test_handle_line_unknown_type_is_dropped() {
        let mut lobby = lobby();
        let replies = handle_line(&mut lobby, &LineCodec::default(), "9999|x|y").unwrap();
        assert!(replies.is_empty());
    }

    #[test]
    fn test_handle_line_parse_failure_is_error() {
        let mut lobby = lobby();
        let err = handle_line(&mut lobby, &LineCodec::default(), "110|bob|G").unwrap_err();
        assert!(matches!(
            err,
            HexforgeError::Protocol(ProtocolError::FieldCount { .. })
        ));
    }

    #[test]
    fn test_handle_line_rejection_becomes_status() {
        let mut lobby = lobby();
        let replies = handle_line(&mut lobby, &LineCodec::default(), "109|Nowhere").unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with(&format!("100|{STATUS_NO_SUCH_GAME}|")));
    }

    #[test]
    fn test_status_reply_text_stays_single_line() {
        let reply = status_reply(&LobbyError::NoSuchGame("a|b".into()), b'|');
        let Message::Status { text, .. } = reply else {
            panic!("expected a status message");
        };
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_handle_line_custom_separator_rejection_still_becomes_status() {
        let mut lobby = lobby();
        let codec = LineCodec::with_separator(b'"').unwrap();
        // The error text quotes the game name, which collides with `"`.
        let replies = handle_line(&mut lobby, &codec, "109\"Nowhere").unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with(&format!("100\"{STATUS_NO_SUCH_GAME}\"")));
        assert_eq!(replies[0].matches('"').count(), 2);
    }

    #[test]
    fn test_handle_line_custom_separator_malformed_options_become_status() {
        let mut lobby = lobby();
        let codec = LineCodec::with_separator(b'\'').unwrap();
        let replies = handle_line(&mut lobby, &codec, "107'alice''localhost'G'PL").unwrap();
        assert_eq!(replies.len(), 1);
        let Message::Status { status, .. } = codec.decode(&replies[0]).unwrap() else {
            panic!("expected a status message");
        };
        assert_ne!(status, crate::STATUS_OK);
    }
}
