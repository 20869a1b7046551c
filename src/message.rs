//! Flat byte messages exchanged with the library.
//!
//! Every public operation takes messages as length-delimited byte
//! buffers. The format hint distinguishes raw bytes from structured JSON;
//! scope-bound schemes additionally parse the JSON envelope with `scope`
//! and `message` fields.

use crate::error::{EncodingError, GroupsigError, GroupsigResult};
use crate::wire;
use serde::{Deserialize, Serialize};

/// Format hint for the content of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Raw bytes, no structure assumed.
    Null,
    /// A JSON document.
    Json,
}

/// A message: a byte buffer plus its format hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub format: MessageFormat,
    pub bytes: Vec<u8>,
}

/// The JSON envelope expected by scope-bound (linkable) schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedMessage {
    pub scope: String,
    pub message: String,
}

impl Message {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Message {
            format: MessageFormat::Null,
            bytes,
        }
    }

    pub fn from_string(s: &str) -> Self {
        Message {
            format: MessageFormat::Null,
            bytes: s.as_bytes().to_vec(),
        }
    }

    pub fn from_json_string(s: &str) -> Self {
        Message {
            format: MessageFormat::Json,
            bytes: s.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The content as UTF-8 text.
    pub fn as_str(&self) -> GroupsigResult<&str> {
        std::str::from_utf8(&self.bytes)
            .map_err(|_| GroupsigError::InvalidArgument("message is not valid utf-8"))
    }

    /// Parses the scope/message JSON envelope used by linkable schemes.
    pub fn scoped(&self) -> GroupsigResult<ScopedMessage> {
        serde_json::from_slice(&self.bytes).map_err(|_| {
            GroupsigError::InvalidArgument("message is not a {scope, message} JSON object")
        })
    }

    pub fn to_base64(&self) -> String {
        wire::to_base64(&self.bytes)
    }

    pub fn from_base64(s: &str) -> Result<Self, EncodingError> {
        Ok(Message::from_bytes(wire::from_base64(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_parsing() {
        let msg =
            Message::from_json_string("{ \"scope\": \"scp\", \"message\": \"Hello, World!\" }");
        let scoped = msg.scoped().unwrap();
        assert_eq!(scoped.scope, "scp");
        assert_eq!(scoped.message, "Hello, World!");

        let raw = Message::from_string("Hello, World!");
        assert!(raw.scoped().is_err());
    }

    #[test]
    fn base64_roundtrip() {
        let msg = Message::from_bytes(vec![1, 9, 6, 9]);
        let again = Message::from_base64(&msg.to_base64()).unwrap();
        assert_eq!(msg.bytes, again.bytes);
    }
}
