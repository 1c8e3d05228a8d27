//! Conversation orchestration.
//!
//! Ties the store, context fusion, and response arbitration together into the
//! chat turn lifecycle: resolve the session, fuse context read from what is
//! already persisted, arbitrate, and persist both sides of the exchange.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use solace_core::emotion::{EmotionLabel, EmotionVector};
use solace_core::session::{ConversationTurn, SessionStats, SessionStore, TurnRole};
use solace_core::{Result, SolaceError};

use crate::arbitrator::{ArbitratedResponse, ResponseArbitrator};
use crate::emotion_history::{EmotionHistoryCache, RETAINED_PER_SESSION};
use crate::fusion::{ContextFusion, PATTERN_WINDOW};
use crate::prompt::HISTORY_TURN_LIMIT;

/// One chat request from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Session to continue; a new session is created when absent.
    pub session_id: Option<String>,
    /// Dominant facial emotion from the client's latest detection, if any.
    pub current_facial_emotion: Option<EmotionLabel>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            current_facial_emotion: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_current_emotion(mut self, emotion: EmotionLabel) -> Self {
        self.current_facial_emotion = Some(emotion);
        self
    }
}

/// The reply for one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Session the exchange was recorded under.
    pub session_id: String,
    pub response_text: String,
    pub crisis_detected: bool,
    /// RFC 3339 time the reply was produced.
    pub timestamp: String,
}

/// Orchestrates chat turns over a session store.
pub struct ChatService {
    /// Authoritative session persistence.
    store: Arc<dyn SessionStore>,
    /// Crisis, generative, and rule-based routing.
    arbitrator: ResponseArbitrator,
    /// Fuses facial, pattern, and textual signals into one snapshot.
    fusion: ContextFusion,
    /// Cached recent vectors per session.
    history: Arc<EmotionHistoryCache>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        arbitrator: ResponseArbitrator,
        history: Arc<EmotionHistoryCache>,
    ) -> Self {
        Self {
            store,
            arbitrator,
            fusion: ContextFusion::new(),
            history,
        }
    }

    /// Runs one chat turn end to end.
    ///
    /// Context is fused from what the store already holds, before this turn
    /// is appended, so the generative prompt's history never duplicates the
    /// message it ends with. Both the user turn and the arbitrated reply are
    /// persisted before the reply is returned.
    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatReply> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(SolaceError::invalid_input("message must not be empty"));
        }

        let session_id = match &request.session_id {
            Some(id) => id.clone(),
            None => self.store.create_session().await?,
        };

        let history_turns = self.store.read_turns(&session_id, HISTORY_TURN_LIMIT).await?;
        let window = self.emotion_window(&session_id).await?;
        let snapshot =
            self.fusion
                .fuse_with_label(request.current_facial_emotion, &window, message);

        self.store
            .append_turn(&session_id, TurnRole::User, message)
            .await?;
        let arbitrated = self.arbitrator.respond(message, &snapshot, &history_turns).await;
        self.store
            .append_turn(&session_id, TurnRole::Assistant, &arbitrated.text)
            .await?;

        Ok(ChatReply {
            session_id,
            response_text: arbitrated.text,
            crisis_detected: arbitrated.crisis_detected,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Arbitrates one message against caller-supplied context, touching no
    /// session state.
    pub async fn respond_with_context(
        &self,
        message: &str,
        current_facial_emotion: Option<EmotionLabel>,
        history: &[ConversationTurn],
        emotion_window: &[EmotionVector],
    ) -> Result<ArbitratedResponse> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SolaceError::invalid_input("message must not be empty"));
        }
        let snapshot = self
            .fusion
            .fuse_with_label(current_facial_emotion, emotion_window, message);
        Ok(self.arbitrator.respond(message, &snapshot, history).await)
    }

    /// Creates an empty session without sending a message.
    pub async fn create_session(&self) -> Result<String> {
        Ok(self.store.create_session().await?)
    }

    /// Reads the most recent `limit` turns of a session, oldest first.
    pub async fn conversation_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>> {
        Ok(self.store.read_turns(session_id, limit).await?)
    }

    /// Reads the most recent `limit` logged emotion distributions,
    /// most-recent-last, straight from the store.
    pub async fn emotion_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<EmotionVector>> {
        Ok(self.store.read_recent_emotions(session_id, limit).await?)
    }

    /// Aggregate statistics for a session.
    pub async fn stats(&self, session_id: &str) -> Result<SessionStats> {
        Ok(self.store.session_stats(session_id).await?)
    }

    /// Drops the cached emotion window so the next turn rereads the store.
    pub fn evict_cached_history(&self, session_id: &str) {
        self.history.evict(session_id);
    }

    /// The fusion window for a session: cache hit when warm, otherwise a
    /// store read that also warms the cache.
    async fn emotion_window(&self, session_id: &str) -> Result<Vec<EmotionVector>> {
        if let Some(window) = self.history.recent(session_id, PATTERN_WINDOW) {
            return Ok(window);
        }
        let stored = self
            .store
            .read_recent_emotions(session_id, RETAINED_PER_SESSION)
            .await?;
        self.history.fill(session_id, &stored);
        let start = stored.len().saturating_sub(PATTERN_WINDOW);
        Ok(stored[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solace_core::emotion::EmotionReading;
    use solace_core::error::StoreError;
    // Shadow the glob-imported `solace_core::Result` alias so the store stub's
    // signatures can name their error type like the trait does.
    use std::result::Result;

    /// Every method panics; used to prove a path never reaches the store.
    struct PanickingStore;

    #[async_trait]
    impl SessionStore for PanickingStore {
        async fn create_session(&self) -> Result<String, StoreError> {
            unreachable!("store must not be touched")
        }

        async fn append_turn(
            &self,
            _session_id: &str,
            _role: TurnRole,
            _content: &str,
        ) -> Result<(), StoreError> {
            unreachable!("store must not be touched")
        }

        async fn read_turns(
            &self,
            _session_id: &str,
            _limit: usize,
        ) -> Result<Vec<ConversationTurn>, StoreError> {
            unreachable!("store must not be touched")
        }

        async fn append_emotion_log(
            &self,
            _session_id: &str,
            _reading: &EmotionReading,
        ) -> Result<(), StoreError> {
            unreachable!("store must not be touched")
        }

        async fn read_recent_emotions(
            &self,
            _session_id: &str,
            _limit: usize,
        ) -> Result<Vec<EmotionVector>, StoreError> {
            unreachable!("store must not be touched")
        }

        async fn session_stats(&self, _session_id: &str) -> Result<SessionStats, StoreError> {
            unreachable!("store must not be touched")
        }
    }

    fn detached_service() -> ChatService {
        ChatService::new(
            Arc::new(PanickingStore),
            ResponseArbitrator::rule_based_only(),
            Arc::new(EmotionHistoryCache::new()),
        )
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_before_any_store_access() {
        let service = detached_service();
        let request = ChatRequest::new("   \t ");

        let result = service.respond(&request).await;

        assert!(result.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_respond_with_context_rejects_blank_messages() {
        let service = detached_service();

        let result = service.respond_with_context("", None, &[], &[]).await;

        assert!(result.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_respond_with_context_touches_no_session_state() {
        let service = detached_service();

        let response = service
            .respond_with_context(
                "I'm fine, everything is okay",
                Some(EmotionLabel::Sad),
                &[],
                &[],
            )
            .await
            .unwrap();

        assert!(response.text.contains("sad"));
        assert!(!response.crisis_detected);
    }
}
