//! Session store trait.
//!
//! Defines the interface for session persistence operations.

use super::stats::SessionStats;
use super::turn::{ConversationTurn, TurnRole};
use crate::emotion::{EmotionReading, EmotionVector};
use crate::error::StoreError;
use async_trait::async_trait;

/// An abstract store for session transcripts and emotion logs.
///
/// This trait defines the contract for persisting and reading session state,
/// decoupling the engine from the specific storage mechanism (in-memory map,
/// TOML documents, remote database). The store is authoritative; any
/// in-process history cache layered on top is an optimization only.
///
/// Sessions are materialized exclusively through
/// [`create_session`](SessionStore::create_session); every other operation
/// fails with [`StoreError::SessionNotFound`] for an unknown id rather than
/// silently creating state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a new empty session and returns its opaque id.
    async fn create_session(&self) -> Result<String, StoreError>;

    /// Appends one conversation turn and bumps the session's update time.
    async fn append_turn(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<(), StoreError>;

    /// Reads the most recent `limit` turns, ordered oldest first.
    ///
    /// Returns everything when the session holds fewer than `limit` turns.
    async fn read_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, StoreError>;

    /// Appends one reading to the session's emotion log.
    ///
    /// Emotion logging does not bump the session's update time; only
    /// conversation turns mark a session as active.
    async fn append_emotion_log(
        &self,
        session_id: &str,
        reading: &EmotionReading,
    ) -> Result<(), StoreError>;

    /// Reads the distributions of the most recent `limit` logged readings,
    /// ordered most-recent-last.
    async fn read_recent_emotions(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<EmotionVector>, StoreError>;

    /// Computes aggregate statistics over everything stored for a session.
    async fn session_stats(&self, session_id: &str) -> Result<SessionStats, StoreError>;
}
