//! Normalized emotion distributions and the raw per-face scores they are
//! built from.

use super::label::EmotionLabel;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Raw emotion scores for a single face, as produced by an estimator backend.
///
/// Possibly sparse (missing labels are implicitly zero) and not necessarily
/// normalized. Weights are expected to be non-negative and finite; the
/// aggregation boundary validates this before any vector is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEmotionScores(HashMap<EmotionLabel, f32>);

impl RawEmotionScores {
    /// Creates an empty score map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the score for one label, replacing any previous value.
    pub fn set(&mut self, label: EmotionLabel, weight: f32) {
        self.0.insert(label, weight);
    }

    /// The score for `label`, zero when absent.
    pub fn get(&self, label: EmotionLabel) -> f32 {
        self.0.get(&label).copied().unwrap_or(0.0)
    }

    /// Iterates over the labels that carry an explicit score.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f32)> + '_ {
        self.0.iter().map(|(label, weight)| (*label, *weight))
    }

    /// True when no label carries an explicit score.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(EmotionLabel, f32)> for RawEmotionScores {
    fn from_iter<I: IntoIterator<Item = (EmotionLabel, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A resolved emotion distribution over the closed label set.
///
/// Invariant: weights are non-negative and sum to 1.0 (within floating-point
/// tolerance) for every value of this type. A no-signal state is represented
/// as `Option<EmotionVector>` = `None` by callers, never as a zero vector.
///
/// Array-backed so iteration follows [`EmotionLabel::ALL`] order; immutable
/// once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionVector([f32; EmotionLabel::COUNT]);

impl EmotionVector {
    /// The distribution with all mass on a single label.
    pub fn single(label: EmotionLabel) -> Self {
        let mut weights = [0.0; EmotionLabel::COUNT];
        weights[label.index()] = 1.0;
        Self(weights)
    }

    /// The defined degenerate distribution: all mass on neutral.
    ///
    /// Returned when aggregation has nothing to normalize (zero grand total).
    pub fn neutral() -> Self {
        Self::single(EmotionLabel::Neutral)
    }

    /// Normalizes one face's raw scores into a distribution.
    pub fn from_raw(scores: &RawEmotionScores) -> Self {
        Self::from_raw_faces(std::slice::from_ref(scores))
    }

    /// Sums raw scores per label across faces and normalizes by the grand
    /// total.
    ///
    /// A zero grand total (no faces, or all-zero scores) yields the neutral
    /// distribution rather than a division by zero. Accumulation runs in
    /// `f64` so aggregation over many faces stays within the unit-sum
    /// tolerance.
    ///
    /// Weights must be non-negative and finite; the aggregation boundary
    /// rejects anything else before calling in here.
    pub fn from_raw_faces(faces: &[RawEmotionScores]) -> Self {
        let mut sums = [0.0f64; EmotionLabel::COUNT];
        for face in faces {
            for (label, weight) in face.iter() {
                sums[label.index()] += f64::from(weight);
            }
        }

        let total: f64 = sums.iter().sum();
        if total <= 0.0 {
            return Self::neutral();
        }

        let mut weights = [0.0f32; EmotionLabel::COUNT];
        for (slot, sum) in weights.iter_mut().zip(sums) {
            *slot = (sum / total) as f32;
        }
        Self(weights)
    }

    /// The weight assigned to `label`.
    pub fn weight(&self, label: EmotionLabel) -> f32 {
        self.0[label.index()]
    }

    /// The argmax label.
    ///
    /// Ties are broken by [`EmotionLabel::ALL`] declaration order (earlier
    /// wins), so repeated calls on equal input are bit-identical.
    pub fn dominant(&self) -> EmotionLabel {
        let mut best = EmotionLabel::ALL[0];
        let mut best_weight = self.0[0];
        for label in EmotionLabel::ALL.into_iter().skip(1) {
            let weight = self.0[label.index()];
            if weight > best_weight {
                best = label;
                best_weight = weight;
            }
        }
        best
    }

    /// The weight of the dominant label.
    pub fn dominant_weight(&self) -> f32 {
        self.weight(self.dominant())
    }

    /// Iterates over all labels with their weights, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f32)> + '_ {
        EmotionLabel::ALL
            .into_iter()
            .map(|label| (label, self.0[label.index()]))
    }

    /// Sum of all weights; 1.0 within tolerance by construction.
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }
}

impl Serialize for EmotionVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain string keys so the same form round-trips through both JSON
        // and TOML documents.
        let mut map = serializer.serialize_map(Some(EmotionLabel::COUNT))?;
        for (label, weight) in self.iter() {
            map.serialize_entry(label.as_str(), &weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = HashMap::<EmotionLabel, f32>::deserialize(deserializer)?;
        for (label, weight) in &entries {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(D::Error::custom(format!(
                    "weight for '{}' must be finite and non-negative, got {}",
                    label, weight
                )));
            }
        }
        // Re-normalize so the unit-sum invariant holds even for documents
        // written with degraded precision or edited by hand.
        let raw: RawEmotionScores = entries.into_iter().collect();
        Ok(Self::from_raw(&raw))
    }
}
