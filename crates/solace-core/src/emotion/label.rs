//! The closed emotion label set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of emotions the engine reasons about.
///
/// Declaration order doubles as the deterministic tie-break priority for
/// dominant-label resolution: when two labels carry the same weight, the one
/// declared earlier wins. Every scan over labels goes through
/// [`EmotionLabel::ALL`] so iteration order is never left to a map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    /// All labels, in tie-break priority order.
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Angry,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
    ];

    /// Number of labels in the closed set.
    pub const COUNT: usize = Self::ALL.len();

    /// The lowercase wire name of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Angry => "angry",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// Parses a lowercase wire name.
    ///
    /// Returns `None` for anything outside the closed set; callers decide
    /// whether an unknown label is an error or a signal to ignore.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "angry" => Some(EmotionLabel::Angry),
            "disgust" => Some(EmotionLabel::Disgust),
            "fear" => Some(EmotionLabel::Fear),
            "happy" => Some(EmotionLabel::Happy),
            "sad" => Some(EmotionLabel::Sad),
            "surprise" => Some(EmotionLabel::Surprise),
            "neutral" => Some(EmotionLabel::Neutral),
            _ => None,
        }
    }

    /// Position of this label within [`EmotionLabel::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_order_matches_indices() {
        for (index, label) in EmotionLabel::ALL.into_iter().enumerate() {
            assert_eq!(label.index(), index);
        }
    }

    #[test]
    fn test_from_name_round_trip() {
        for label in EmotionLabel::ALL {
            assert_eq!(EmotionLabel::from_name(label.as_str()), Some(label));
        }
        assert_eq!(EmotionLabel::from_name("bliss"), None);
        assert_eq!(EmotionLabel::from_name("Sad"), None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&EmotionLabel::Surprise).unwrap();
        assert_eq!(json, "\"surprise\"");

        let parsed: EmotionLabel = serde_json::from_str("\"angry\"").unwrap();
        assert_eq!(parsed, EmotionLabel::Angry);
    }
}
