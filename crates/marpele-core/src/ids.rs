//! Strongly typed identifiers for chat contexts and participants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the chat (or any other context) that hosts at most one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(pub i64);

/// Identifies a chat user taking part in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&(ContextId(-100_123), ParticipantId(42))).unwrap();
        assert_eq!(json, "[-100123,42]");
    }

    #[test]
    fn test_ids_display_inner_value() {
        assert_eq!(ContextId(7).to_string(), "7");
        assert_eq!(ParticipantId(-3).to_string(), "-3");
    }
}
