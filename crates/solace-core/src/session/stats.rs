//! Aggregate statistics over a session's stored activity.

use crate::emotion::{EmotionLabel, EmotionReading};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-label aggregate over a session's emotion log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionOccurrence {
    /// How many logged readings had this dominant label.
    pub count: usize,
    /// Mean confidence across those readings.
    pub avg_confidence: f32,
}

/// Summary of one session's stored conversation and emotion activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    /// Keyed by each dominant label observed in the emotion log.
    pub emotion_distribution: HashMap<EmotionLabel, EmotionOccurrence>,
    /// Total conversation turns recorded, both roles.
    pub message_count: usize,
    /// When the session was created (RFC 3339).
    pub created_at: String,
    /// Last time a conversation turn was appended (RFC 3339).
    pub updated_at: String,
}

impl SessionStats {
    /// Aggregates an emotion log into per-label counts and mean confidence.
    ///
    /// Shared by store implementations so the stats contract cannot drift
    /// between backends.
    pub fn from_readings(
        session_id: impl Into<String>,
        readings: &[EmotionReading],
        message_count: usize,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        let mut totals: HashMap<EmotionLabel, (usize, f64)> = HashMap::new();
        for reading in readings {
            let entry = totals.entry(reading.dominant_emotion).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += f64::from(reading.confidence);
        }

        let emotion_distribution = totals
            .into_iter()
            .map(|(label, (count, confidence_total))| {
                let occurrence = EmotionOccurrence {
                    count,
                    avg_confidence: (confidence_total / count as f64) as f32,
                };
                (label, occurrence)
            })
            .collect();

        Self {
            session_id: session_id.into(),
            emotion_distribution,
            message_count,
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{EmotionVector, RawEmotionScores};

    fn reading(label: EmotionLabel, weight_rest: f32) -> EmotionReading {
        let scores: RawEmotionScores = [(label, 1.0), (EmotionLabel::Neutral, weight_rest)]
            .into_iter()
            .collect();
        EmotionReading::from_vector(EmotionVector::from_raw(&scores), Vec::new())
    }

    #[test]
    fn test_from_readings_counts_and_averages() {
        // Two sad readings at confidence 0.8 and 0.5, one happy at 1.0.
        let readings = vec![
            reading(EmotionLabel::Sad, 0.25),
            reading(EmotionLabel::Sad, 1.0),
            reading(EmotionLabel::Happy, 0.0),
        ];

        let stats =
            SessionStats::from_readings("s-1", &readings, 4, "2026-01-01T00:00:00Z", "2026-01-02T00:00:00Z");

        assert_eq!(stats.session_id, "s-1");
        assert_eq!(stats.message_count, 4);
        assert_eq!(stats.emotion_distribution.len(), 2);

        let sad = stats.emotion_distribution[&EmotionLabel::Sad];
        assert_eq!(sad.count, 2);
        assert!((sad.avg_confidence - 0.65).abs() < 1e-6);

        let happy = stats.emotion_distribution[&EmotionLabel::Happy];
        assert_eq!(happy.count, 1);
        assert!((happy.avg_confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_readings_empty_log() {
        let stats = SessionStats::from_readings("s-2", &[], 0, "t0", "t0");

        assert!(stats.emotion_distribution.is_empty());
        assert_eq!(stats.message_count, 0);
    }

    #[test]
    fn test_no_signal_readings_count_with_zero_confidence() {
        let readings = vec![EmotionReading::no_signal(Vec::new())];

        let stats = SessionStats::from_readings("s-3", &readings, 0, "t0", "t0");

        let neutral = stats.emotion_distribution[&EmotionLabel::Neutral];
        assert_eq!(neutral.count, 1);
        assert_eq!(neutral.avg_confidence, 0.0);
    }
}
