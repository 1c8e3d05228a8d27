//! In-memory SessionStore implementation.

use async_trait::async_trait;
use chrono::Utc;
use solace_core::emotion::{EmotionReading, EmotionVector};
use solace_core::error::StoreError;
use solace_core::session::{ConversationTurn, SessionStats, SessionStore, TurnRole};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct SessionRecord {
    turns: Vec<ConversationTurn>,
    emotion_log: Vec<EmotionReading>,
    created_at: String,
    updated_at: String,
}

/// Keeps every session in a process-local map.
///
/// State is lost when the process exits; use
/// [`DirSessionStore`](crate::DirSessionStore) for anything that must
/// survive a restart. Mainly useful for tests and ephemeral deployments.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of sessions currently held.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let record = SessionRecord {
            created_at: now.clone(),
            updated_at: now,
            ..Default::default()
        };
        self.sessions.write().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn append_turn(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        let turn = ConversationTurn::new(role, content);
        record.updated_at = turn.timestamp.clone();
        record.turns.push(turn);
        Ok(())
    }

    async fn read_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        let start = record.turns.len().saturating_sub(limit);
        Ok(record.turns[start..].to_vec())
    }

    async fn append_emotion_log(
        &self,
        session_id: &str,
        reading: &EmotionReading,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        record.emotion_log.push(reading.clone());
        Ok(())
    }

    async fn read_recent_emotions(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<EmotionVector>, StoreError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        let start = record.emotion_log.len().saturating_sub(limit);
        Ok(record.emotion_log[start..]
            .iter()
            .map(|reading| reading.emotions)
            .collect())
    }

    async fn session_stats(&self, session_id: &str) -> Result<SessionStats, StoreError> {
        let sessions = self.sessions.read().await;
        let record = sessions
            .get(session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;
        Ok(SessionStats::from_readings(
            session_id,
            &record.emotion_log,
            record.turns.len(),
            record.created_at.clone(),
            record.updated_at.clone(),
        ))
    }
}
