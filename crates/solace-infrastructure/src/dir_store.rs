//! TOML-file-backed SessionStore implementation.
//!
//! Stores each session as one TOML document:
//!
//! ```text
//! base_dir/
//! └── sessions/
//!     ├── <session-id>.toml
//!     └── ...
//! ```

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use solace_core::emotion::{EmotionLabel, EmotionReading, EmotionVector, FaceRegion};
use solace_core::error::StoreError;
use solace_core::session::{ConversationTurn, SessionStats, SessionStore, TurnRole};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::paths::SolacePaths;

/// On-disk shape of one emotion reading.
///
/// Scalar fields come before the vector table and the region array so the
/// document serializes cleanly; kept separate from the domain type so the
/// file format does not drift with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredReading {
    faces_detected: usize,
    dominant_emotion: EmotionLabel,
    confidence: f32,
    timestamp: String,
    emotions: EmotionVector,
    #[serde(default)]
    face_locations: Vec<FaceRegion>,
}

impl From<&EmotionReading> for StoredReading {
    fn from(reading: &EmotionReading) -> Self {
        Self {
            faces_detected: reading.faces_detected,
            dominant_emotion: reading.dominant_emotion,
            confidence: reading.confidence,
            timestamp: reading.timestamp.clone(),
            emotions: reading.emotions,
            face_locations: reading.face_locations.clone(),
        }
    }
}

impl StoredReading {
    fn into_domain(self) -> EmotionReading {
        EmotionReading {
            faces_detected: self.faces_detected,
            dominant_emotion: self.dominant_emotion,
            emotions: self.emotions,
            confidence: self.confidence,
            face_locations: self.face_locations,
            timestamp: self.timestamp,
        }
    }
}

/// On-disk session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionDocument {
    id: String,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    turns: Vec<ConversationTurn>,
    #[serde(default)]
    emotion_log: Vec<StoredReading>,
}

/// A session store persisting each session to its own TOML file.
///
/// Writes go through a temporary file that is flushed to disk before being
/// renamed into place, so a crash mid-write leaves the previous document
/// intact. Read-modify-write cycles serialize per session within this
/// instance; run one store per directory.
pub struct DirSessionStore {
    sessions_dir: PathBuf,
    /// One write lock per session id; load-modify-save cycles for the same
    /// session serialize, different sessions do not contend.
    write_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl DirSessionStore {
    /// Opens (and creates if needed) a store rooted at `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let sessions_dir = base_dir.as_ref().join("sessions");
        fs::create_dir_all(&sessions_dir).await?;
        Ok(Self {
            sessions_dir,
            write_locks: RwLock::new(HashMap::new()),
        })
    }

    /// Opens the store at the platform config location (`~/.config/solace`).
    pub async fn default_location() -> Result<Self, StoreError> {
        let base_dir = SolacePaths::config_dir().map_err(|err| StoreError::backend(err.to_string()))?;
        tracing::debug!("Opening session store at: {:?}", base_dir);
        Self::new(base_dir).await
    }

    /// The directory session documents live in.
    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{}.toml", session_id))
    }

    async fn load(&self, session_id: &str) -> Result<SessionDocument, StoreError> {
        // Ids the store never minted (path separators, dots) must not be able
        // to address files outside the sessions directory.
        if !is_safe_id(session_id) {
            return Err(StoreError::session_not_found(session_id));
        }

        let path = self.session_file_path(session_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::session_not_found(session_id));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&content)?)
    }

    async fn save(&self, document: &SessionDocument) -> Result<(), StoreError> {
        let path = self.session_file_path(&document.id);
        let content = toml::to_string_pretty(document)?;

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content).await?;
        // Flush file data to disk before the rename publishes the document.
        fs::File::open(&tmp_path).await?.sync_all().await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self
                .write_locks
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(lock) = locks.get(session_id) {
                return lock.clone();
            }
        }
        let mut locks = self
            .write_locks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(session_id.to_string()).or_default().clone()
    }
}

fn is_safe_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl SessionStore for DirSessionStore {
    async fn create_session(&self) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let lock = self.session_lock(&id);
        let _guard = lock.lock().await;
        let now = Utc::now().to_rfc3339();
        let document = SessionDocument {
            id: id.clone(),
            created_at: now.clone(),
            updated_at: now,
            turns: Vec::new(),
            emotion_log: Vec::new(),
        };
        self.save(&document).await?;
        tracing::debug!("Created session document: {:?}", self.session_file_path(&id));
        Ok(id)
    }

    async fn append_turn(
        &self,
        session_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<(), StoreError> {
        let lock = self.session_lock(session_id);
        let _guard = lock.lock().await;
        let mut document = self.load(session_id).await?;
        let turn = ConversationTurn::new(role, content);
        document.updated_at = turn.timestamp.clone();
        document.turns.push(turn);
        self.save(&document).await
    }

    async fn read_turns(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let mut document = self.load(session_id).await?;
        let start = document.turns.len().saturating_sub(limit);
        Ok(document.turns.split_off(start))
    }

    async fn append_emotion_log(
        &self,
        session_id: &str,
        reading: &EmotionReading,
    ) -> Result<(), StoreError> {
        let lock = self.session_lock(session_id);
        let _guard = lock.lock().await;
        let mut document = self.load(session_id).await?;
        document.emotion_log.push(StoredReading::from(reading));
        self.save(&document).await
    }

    async fn read_recent_emotions(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<EmotionVector>, StoreError> {
        let document = self.load(session_id).await?;
        let start = document.emotion_log.len().saturating_sub(limit);
        Ok(document.emotion_log[start..]
            .iter()
            .map(|stored| stored.emotions)
            .collect())
    }

    async fn session_stats(&self, session_id: &str) -> Result<SessionStats, StoreError> {
        let document = self.load(session_id).await?;
        let readings: Vec<EmotionReading> = document
            .emotion_log
            .into_iter()
            .map(StoredReading::into_domain)
            .collect();
        Ok(SessionStats::from_readings(
            session_id,
            &readings,
            document.turns.len(),
            document.created_at,
            document.updated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reading_with_face() -> EmotionReading {
        EmotionReading::from_vector(
            EmotionVector::single(EmotionLabel::Sad),
            vec![FaceRegion {
                x: 10,
                y: 20,
                width: 48,
                height: 48,
            }],
        )
    }

    #[tokio::test]
    async fn test_create_and_read_back_turns() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();

        let id = store.create_session().await.unwrap();
        store
            .append_turn(&id, TurnRole::User, "hello")
            .await
            .unwrap();
        store
            .append_turn(&id, TurnRole::Assistant, "hi, how are you feeling?")
            .await
            .unwrap();

        // The document exists on disk under sessions/.
        let file = temp_dir.path().join("sessions").join(format!("{}.toml", id));
        assert!(file.exists(), "Should write one TOML file per session");

        let turns = store.read_turns(&id, 10).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn test_writes_leave_only_the_session_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();
        let id = store.create_session().await.unwrap();
        store
            .append_turn(&id, TurnRole::User, "hello")
            .await
            .unwrap();

        // No temporary file may outlive the write.
        let names: Vec<String> = std::fs::read_dir(store.sessions_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![format!("{}.toml", id)]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_no_turns() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(DirSessionStore::new(temp_dir.path()).await.unwrap());
        let first = store.create_session().await.unwrap();
        let second = store.create_session().await.unwrap();

        // Interleaved load-modify-save cycles on the same document would
        // drop turns without the per-session lock.
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let id = if i % 2 == 0 {
                    first.clone()
                } else {
                    second.clone()
                };
                tokio::spawn(async move {
                    store
                        .append_turn(&id, TurnRole::User, &format!("turn {}", i))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.read_turns(&first, 64).await.unwrap().len(), 4);
        assert_eq!(store.read_turns(&second, 64).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_sessions_survive_a_new_store_instance() {
        let temp_dir = TempDir::new().unwrap();
        let id = {
            let store = DirSessionStore::new(temp_dir.path()).await.unwrap();
            let id = store.create_session().await.unwrap();
            store
                .append_turn(&id, TurnRole::User, "remember me")
                .await
                .unwrap();
            store
                .append_emotion_log(&id, &reading_with_face())
                .await
                .unwrap();
            id
        };

        let reopened = DirSessionStore::new(temp_dir.path()).await.unwrap();

        let turns = reopened.read_turns(&id, 10).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "remember me");

        let vectors = reopened.read_recent_emotions(&id, 10).await.unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].dominant(), EmotionLabel::Sad);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();

        let err = store.read_turns("missing", 5).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_ids_with_path_separators_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();

        for id in ["../escape", "a/b", "a\\b", "..", ""] {
            let err = store.read_turns(id, 5).await.unwrap_err();
            assert!(err.is_not_found(), "Should reject id {:?}", id);
        }
    }

    #[tokio::test]
    async fn test_emotion_log_and_stats_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();

        let id = store.create_session().await.unwrap();
        store
            .append_emotion_log(&id, &reading_with_face())
            .await
            .unwrap();
        store
            .append_emotion_log(&id, &reading_with_face())
            .await
            .unwrap();
        store.append_turn(&id, TurnRole::User, "hi").await.unwrap();

        let stats = store.session_stats(&id).await.unwrap();
        assert_eq!(stats.message_count, 1);
        let sad = stats.emotion_distribution[&EmotionLabel::Sad];
        assert_eq!(sad.count, 2);
        assert!((sad.avg_confidence - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_emotion_logging_does_not_bump_updated_at() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();
        let id = store.create_session().await.unwrap();

        let before = store.session_stats(&id).await.unwrap().updated_at;
        store
            .append_emotion_log(&id, &reading_with_face())
            .await
            .unwrap();
        let after = store.session_stats(&id).await.unwrap().updated_at;

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path()).await.unwrap();
        let id = store.create_session().await.unwrap();

        let file = temp_dir.path().join("sessions").join(format!("{}.toml", id));
        std::fs::write(&file, "this is not a session document").unwrap();

        let err = store.read_turns(&id, 5).await.unwrap_err();
        assert!(err.is_serialization());
    }
}
