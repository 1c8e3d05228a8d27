//! In-process cache of recent emotion vectors per session.
//!
//! The store stays authoritative; this cache only spares the fusion step a
//! store read on every chat turn.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use solace_core::emotion::EmotionVector;

/// How many vectors each session retains in the hot window.
pub const RETAINED_PER_SESSION: usize = 32;

/// Bounded per-session windows of recently detected emotion vectors.
///
/// A session that was never pushed to or filled is a miss (`None` from
/// [`recent`](EmotionHistoryCache::recent)); a session filled with an empty
/// log is a hit with no vectors (`Some(vec![])`). Callers use the distinction
/// to decide whether a store read is still needed.
#[derive(Debug, Default)]
pub struct EmotionHistoryCache {
    sessions: RwLock<HashMap<String, Arc<Mutex<VecDeque<EmotionVector>>>>>,
}

impl EmotionHistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one vector to the session's window, dropping the oldest
    /// entries beyond [`RETAINED_PER_SESSION`].
    pub fn push(&self, session_id: &str, vector: EmotionVector) {
        let entry = self.entry(session_id);
        let mut window = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        window.push_back(vector);
        while window.len() > RETAINED_PER_SESSION {
            window.pop_front();
        }
    }

    /// Returns up to the last `limit` vectors, oldest first, or `None` when
    /// the session is not cached.
    pub fn recent(&self, session_id: &str, limit: usize) -> Option<Vec<EmotionVector>> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = sessions.get(session_id)?.clone();
        drop(sessions);

        let window = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let start = window.len().saturating_sub(limit);
        Some(window.iter().skip(start).copied().collect())
    }

    /// Replaces the session's window with `vectors` (most-recent-last),
    /// keeping at most the trailing [`RETAINED_PER_SESSION`] of them.
    pub fn fill(&self, session_id: &str, vectors: &[EmotionVector]) {
        let entry = self.entry(session_id);
        let mut window = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        window.clear();
        let start = vectors.len().saturating_sub(RETAINED_PER_SESSION);
        window.extend(vectors[start..].iter().copied());
    }

    /// Drops the session's window entirely, forcing the next read through to
    /// the store.
    pub fn evict(&self, session_id: &str) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(session_id);
    }

    /// Drops every cached window.
    pub fn clear(&self) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn entry(&self, session_id: &str) -> Arc<Mutex<VecDeque<EmotionVector>>> {
        {
            let sessions = self
                .sessions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(entry) = sessions.get(session_id) {
                return entry.clone();
            }
        }
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.entry(session_id.to_string()).or_default().clone()
    }
}
