//! Party-level settings: phase, party size and cancellation policy.

use std::fmt;

use marpele_core::error::GameError;
use serde::{Deserialize, Serialize};

/// Negotiation phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed but not yet opened.
    Created,
    /// Waiting for the party size.
    SelectMode,
    /// Waiting for the difficulty.
    SelectLevel,
    /// Waiting for every seat to claim a token.
    SelectToken,
    /// Turns are being played.
    Active,
    /// Won or cancelled; the session is about to leave the registry.
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::SelectMode => "select_mode",
            Self::SelectLevel => "select_level",
            Self::SelectToken => "select_token",
            Self::Active => "active",
            Self::Terminal => "terminal",
        })
    }
}

/// Number of seats in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Capacity {
    /// Two players.
    Two,
    /// Four players.
    Four,
}

impl Capacity {
    /// Number of seats.
    #[must_use]
    pub fn seats(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u8> for Capacity {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(GameError::Validation(format!(
                "capacity must be 2 or 4, got {other}"
            ))),
        }
    }
}

impl From<Capacity> for u8 {
    fn from(capacity: Capacity) -> Self {
        match capacity {
            Capacity::Two => 2,
            Capacity::Four => 4,
        }
    }
}

/// Who may cancel a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Only the participant who created the session.
    Initiator,
    /// Anyone seated in the session.
    #[default]
    Participant,
    /// Anyone in the chat.
    Anyone,
}
