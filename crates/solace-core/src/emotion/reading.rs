//! Detection results with capture metadata.

use super::label::EmotionLabel;
use super::vector::EmotionVector;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a detected face, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The result of one emotion-detection pass over a frame.
///
/// `confidence` is the weight of the dominant label when the distribution was
/// computed, and 0.0 when it was not; callers must treat confidence 0.0 as
/// "no real signal", not as certainty about neutrality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Number of faces the localizer reported.
    pub faces_detected: usize,
    /// Argmax label of `emotions`.
    pub dominant_emotion: EmotionLabel,
    /// Aggregated distribution across all usable faces.
    pub emotions: EmotionVector,
    /// Weight of the dominant label, or 0.0 for a no-signal reading.
    pub confidence: f32,
    /// Bounding boxes of the located faces.
    pub face_locations: Vec<FaceRegion>,
    /// Capture timestamp (RFC 3339).
    pub timestamp: String,
}

impl EmotionReading {
    /// Builds a reading from a computed distribution.
    pub fn from_vector(emotions: EmotionVector, face_locations: Vec<FaceRegion>) -> Self {
        let dominant_emotion = emotions.dominant();
        Self {
            faces_detected: face_locations.len(),
            dominant_emotion,
            confidence: emotions.weight(dominant_emotion),
            emotions,
            face_locations,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The degenerate reading for a frame that yielded no usable signal.
    ///
    /// Used both for zero located faces and for the degraded case where faces
    /// were located but none could be scored; the locations are kept so
    /// callers still see where the faces were.
    pub fn no_signal(face_locations: Vec<FaceRegion>) -> Self {
        Self {
            faces_detected: face_locations.len(),
            dominant_emotion: EmotionLabel::Neutral,
            emotions: EmotionVector::neutral(),
            confidence: 0.0,
            face_locations,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
