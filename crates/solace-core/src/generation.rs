//! Text-generation boundary.
//!
//! The engine never talks to a language-model backend directly; it builds a
//! provider-agnostic [`GenerationPrompt`] and hands it to a [`TextGenerator`]
//! collaborator. Every failure mode is a [`GenerationError`] the arbitrator
//! recovers from by falling back; nothing in here is user-visible.

use crate::session::TurnRole;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One role-tagged message in a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: TurnRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A provider-agnostic chat prompt.
///
/// Backends map this onto their own wire format; the system instructions are
/// kept apart from the turns because providers tag them differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    /// Instructions governing the whole exchange.
    pub system: String,
    /// Conversation turns, oldest first, ending with the user's new message.
    pub messages: Vec<PromptMessage>,
}

/// Failures from text-generation backends.
///
/// The arbitrator treats every variant identically (log and fall back), so
/// these exist for observability and tests rather than control flow.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GenerationError {
    /// No usable backend configuration (missing API key, etc.)
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure before any response arrived
    #[error("Network error: {message}")]
    Network { message: String, is_timeout: bool },

    /// The call exceeded its deadline
    #[error("Generation timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The backend answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The backend answered with something unusable
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Creates a Malformed error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// True when the failure was a deadline, whether the engine's own or the
    /// transport's.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Network { is_timeout, .. } => *is_timeout,
            _ => false,
        }
    }
}

/// An abstract text-generation backend.
///
/// Calls may block on network I/O and must be expected to fail or time out;
/// implementations bound their own transport, and the arbitrator adds an
/// outer deadline on top.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerationError>;
}
