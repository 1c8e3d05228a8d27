//! Frame-to-reading pipeline.
//!
//! Localizes faces, estimates per-face emotion scores, aggregates them into a
//! normalized reading, and logs the reading for the owning session.

use std::sync::Arc;

use solace_core::emotion::{EmotionReading, RawEmotionScores};
use solace_core::session::SessionStore;
use solace_core::vision::{DetectionError, FaceEmotionEstimator, FaceLocalizer, Frame};
use solace_core::{Result, SolaceError};

use crate::aggregator::EmotionAggregator;
use crate::emotion_history::EmotionHistoryCache;

/// Turns raw frames into logged [`EmotionReading`]s.
///
/// Estimation faults degrade per face: a face whose estimator call fails is
/// skipped with a warning, and a frame where every face fails (or none is
/// found) yields a no-signal reading instead of an error. Only invalid input
/// and localizer faults surface as errors.
pub struct EmotionDetectionService {
    /// Finds face regions in a frame.
    localizer: Arc<dyn FaceLocalizer>,
    /// Scores the emotions of one localized face.
    estimator: Arc<dyn FaceEmotionEstimator>,
    /// Durable per-session emotion log.
    store: Arc<dyn SessionStore>,
    /// Hot window feeding context fusion.
    history: Arc<EmotionHistoryCache>,
    aggregator: EmotionAggregator,
}

impl EmotionDetectionService {
    pub fn new(
        localizer: Arc<dyn FaceLocalizer>,
        estimator: Arc<dyn FaceEmotionEstimator>,
        store: Arc<dyn SessionStore>,
        history: Arc<EmotionHistoryCache>,
    ) -> Self {
        Self {
            localizer,
            estimator,
            store,
            history,
            aggregator: EmotionAggregator::new(),
        }
    }

    /// Processes one frame and returns the resulting reading.
    ///
    /// When `session_id` is given the reading is appended to that session's
    /// emotion log and pushed into the hot window; without a session the
    /// reading is returned only.
    pub async fn detect(&self, frame: &Frame, session_id: Option<&str>) -> Result<EmotionReading> {
        frame.validate()?;

        let faces = self
            .localizer
            .detect(frame)
            .map_err(map_localizer_error)?;

        if faces.is_empty() {
            let reading = EmotionReading::no_signal(Vec::new());
            self.log_reading(session_id, &reading).await?;
            return Ok(reading);
        }

        let mut scores: Vec<RawEmotionScores> = Vec::with_capacity(faces.len());
        for (index, region) in faces.iter().enumerate() {
            match self.estimator.estimate(frame, region) {
                Ok(face_scores) => scores.push(face_scores),
                Err(err) => {
                    tracing::warn!(
                        "[EmotionDetectionService] Estimation failed for face {}: {}",
                        index,
                        err
                    );
                }
            }
        }

        let reading = if scores.is_empty() {
            EmotionReading::no_signal(faces)
        } else {
            let emotions = self.aggregator.aggregate(&scores)?;
            EmotionReading::from_vector(emotions, faces)
        };

        self.log_reading(session_id, &reading).await?;
        Ok(reading)
    }

    async fn log_reading(&self, session_id: Option<&str>, reading: &EmotionReading) -> Result<()> {
        let Some(session_id) = session_id else {
            return Ok(());
        };
        self.store.append_emotion_log(session_id, reading).await?;
        self.history.push(session_id, reading.emotions);
        Ok(())
    }
}

fn map_localizer_error(err: DetectionError) -> SolaceError {
    match err {
        DetectionError::InvalidFrame(message) => {
            SolaceError::invalid_input(format!("invalid frame: {}", message))
        }
        DetectionError::Backend(message) => {
            SolaceError::internal(format!("face localization failed: {}", message))
        }
    }
}
