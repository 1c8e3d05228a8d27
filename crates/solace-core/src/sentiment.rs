//! Textual sentiment categories and the fused per-turn context.

use crate::emotion::EmotionLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment classes derived from a message's text.
///
/// Produced once per message and consumed immediately by fusion; never
/// persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    /// Self-harm or crisis language; preempts every other response path.
    Crisis,
    Stress,
    Sadness,
    Anger,
    Fear,
    Neutral,
}

impl SentimentCategory {
    /// The lowercase wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Crisis => "crisis",
            SentimentCategory::Stress => "stress",
            SentimentCategory::Sadness => "sadness",
            SentimentCategory::Anger => "anger",
            SentimentCategory::Fear => "fear",
            SentimentCategory::Neutral => "neutral",
        }
    }

    /// True for the category that triggers the safety override.
    pub fn is_crisis(&self) -> bool {
        matches!(self, Self::Crisis)
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the arbitrator knows about the user's state for one message.
///
/// Constructed fresh per turn by fusion and never mutated. Absent facial
/// signals stay `None` so consumers can tell "no signal" from "neutral
/// signal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Dominant label of the most recent facial reading, if one exists.
    pub current_facial_emotion: Option<EmotionLabel>,
    /// Most frequent dominant label across the recent facial window, if any.
    pub recent_facial_pattern: Option<EmotionLabel>,
    /// Category assigned to the message text.
    pub textual_category: SentimentCategory,
}

impl ContextSnapshot {
    /// A snapshot carrying no facial signal at all.
    pub fn text_only(textual_category: SentimentCategory) -> Self {
        Self {
            current_facial_emotion: None,
            recent_facial_pattern: None,
            textual_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_crisis_is_crisis() {
        assert!(SentimentCategory::Crisis.is_crisis());
        for category in [
            SentimentCategory::Stress,
            SentimentCategory::Sadness,
            SentimentCategory::Anger,
            SentimentCategory::Fear,
            SentimentCategory::Neutral,
        ] {
            assert!(!category.is_crisis());
        }
    }

    #[test]
    fn test_text_only_snapshot_has_no_facial_signal() {
        let snapshot = ContextSnapshot::text_only(SentimentCategory::Stress);

        assert_eq!(snapshot.current_facial_emotion, None);
        assert_eq!(snapshot.recent_facial_pattern, None);
        assert_eq!(snapshot.textual_category, SentimentCategory::Stress);
    }
}
