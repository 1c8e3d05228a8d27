//! Per-face emotion score aggregation.

use solace_core::emotion::{EmotionVector, RawEmotionScores};
use solace_core::error::{Result, SolaceError};

/// Aggregates raw per-face score maps into one normalized distribution.
///
/// Pure and deterministic: repeated calls on the same input produce
/// bit-identical output.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionAggregator;

impl EmotionAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Validates and normalizes `faces` into a single distribution.
    ///
    /// Scores for the same label are summed across faces and divided by the
    /// grand total; a zero grand total yields the all-mass-on-neutral
    /// distribution instead of dividing by zero.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when any face carries a negative or non-finite weight,
    /// naming the offending label and face.
    pub fn aggregate(&self, faces: &[RawEmotionScores]) -> Result<EmotionVector> {
        for (face_index, face) in faces.iter().enumerate() {
            for (label, weight) in face.iter() {
                if weight < 0.0 {
                    return Err(SolaceError::invalid_input(format!(
                        "negative weight {} for '{}' in face {}",
                        weight, label, face_index
                    )));
                }
                if !weight.is_finite() {
                    return Err(SolaceError::invalid_input(format!(
                        "non-finite weight for '{}' in face {}",
                        label, face_index
                    )));
                }
            }
        }

        Ok(EmotionVector::from_raw_faces(faces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::emotion::EmotionLabel;

    fn scores(pairs: &[(EmotionLabel, f32)]) -> RawEmotionScores {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_aggregate_sums_to_one() {
        let aggregator = EmotionAggregator::new();
        let faces = vec![
            scores(&[(EmotionLabel::Happy, 0.9), (EmotionLabel::Neutral, 0.1)]),
            scores(&[(EmotionLabel::Sad, 0.6), (EmotionLabel::Happy, 0.4)]),
            scores(&[(EmotionLabel::Angry, 2.5)]),
        ];

        let vector = aggregator.aggregate(&faces).unwrap();

        assert!((vector.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_is_bit_identical() {
        let aggregator = EmotionAggregator::new();
        let faces = vec![scores(&[
            (EmotionLabel::Fear, 0.31),
            (EmotionLabel::Surprise, 0.27),
        ])];

        let first = aggregator.aggregate(&faces).unwrap();
        let second = aggregator.aggregate(&faces).unwrap();

        for (label, weight) in first.iter() {
            assert_eq!(weight.to_bits(), second.weight(label).to_bits());
        }
    }

    #[test]
    fn test_zero_total_yields_neutral_mass() {
        let aggregator = EmotionAggregator::new();

        let vector = aggregator
            .aggregate(&[scores(&[(EmotionLabel::Happy, 0.0)])])
            .unwrap();

        assert_eq!(vector.dominant(), EmotionLabel::Neutral);
        assert_eq!(vector.weight(EmotionLabel::Neutral), 1.0);
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let aggregator = EmotionAggregator::new();
        let faces = vec![
            scores(&[(EmotionLabel::Happy, 0.5)]),
            scores(&[(EmotionLabel::Sad, -0.1)]),
        ];

        let err = aggregator.aggregate(&faces).unwrap_err();

        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("sad"));
        assert!(err.to_string().contains("face 1"));
    }

    #[test]
    fn test_non_finite_weight_is_rejected() {
        let aggregator = EmotionAggregator::new();

        let err = aggregator
            .aggregate(&[scores(&[(EmotionLabel::Fear, f32::NAN)])])
            .unwrap_err();

        assert!(err.is_invalid_input());
    }
}
