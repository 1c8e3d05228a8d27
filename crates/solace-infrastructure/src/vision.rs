//! Built-in vision backends.
//!
//! These stand in where no real computer-vision stack is wired up: the
//! localizer treats the whole frame as one face and the estimator returns a
//! fixed mildly-neutral distribution. Real backends implement the same two
//! core traits.

use solace_core::emotion::{EmotionLabel, FaceRegion, RawEmotionScores};
use solace_core::vision::{DetectionError, FaceEmotionEstimator, FaceLocalizer, Frame};

/// Treats the entire frame as a single face region.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullFrameLocalizer;

impl FullFrameLocalizer {
    pub fn new() -> Self {
        Self
    }
}

impl FaceLocalizer for FullFrameLocalizer {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceRegion>, DetectionError> {
        Ok(vec![FaceRegion {
            x: 0,
            y: 0,
            width: frame.width,
            height: frame.height,
        }])
    }
}

/// Returns the same mildly-neutral score distribution for every face.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticEmotionEstimator;

impl StaticEmotionEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl FaceEmotionEstimator for StaticEmotionEstimator {
    fn estimate(
        &self,
        _frame: &Frame,
        _region: &FaceRegion,
    ) -> Result<RawEmotionScores, DetectionError> {
        Ok([
            (EmotionLabel::Angry, 0.1),
            (EmotionLabel::Disgust, 0.05),
            (EmotionLabel::Fear, 0.1),
            (EmotionLabel::Happy, 0.2),
            (EmotionLabel::Sad, 0.15),
            (EmotionLabel::Surprise, 0.1),
            (EmotionLabel::Neutral, 0.3),
        ]
        .into_iter()
        .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::emotion::EmotionVector;

    #[test]
    fn test_full_frame_localizer_covers_the_frame() {
        let frame = Frame::new(640, 480, vec![0; 640 * 480 * 3]);

        let regions = FullFrameLocalizer::new().detect(&frame).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].width, 640);
        assert_eq!(regions[0].height, 480);
    }

    #[test]
    fn test_static_estimator_leans_neutral() {
        let frame = Frame::new(2, 2, vec![0; 12]);
        let region = FaceRegion {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };

        let scores = StaticEmotionEstimator::new()
            .estimate(&frame, &region)
            .unwrap();
        let vector = EmotionVector::from_raw(&scores);

        assert_eq!(vector.dominant(), EmotionLabel::Neutral);
        assert!((vector.dominant_weight() - 0.3).abs() < 1e-6);
        assert!((vector.weight(EmotionLabel::Happy) - 0.2).abs() < 1e-6);
    }
}
