//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person seeking support.
    User,
    /// The engine's reply, whichever path produced it.
    Assistant,
}

impl TurnRole {
    /// The lowercase wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub role: TurnRole,
    /// The turn's text.
    pub content: String,
    /// When the turn was recorded (RFC 3339).
    pub timestamp: String,
}

impl ConversationTurn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
