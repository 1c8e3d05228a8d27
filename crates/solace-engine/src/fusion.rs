//! Fusion of facial and textual signals into a per-turn snapshot.

use crate::sentiment::SentimentClassifier;
use solace_core::emotion::{EmotionLabel, EmotionVector};
use solace_core::sentiment::ContextSnapshot;

/// How many of the window's most recent entries feed the pattern.
pub const PATTERN_WINDOW: usize = 5;

/// Combines the current facial distribution, a short window of prior
/// distributions, and the message text into one [`ContextSnapshot`].
///
/// Pure composition: the caller supplies the window (read from the store or
/// the history cache); fusion never performs I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextFusion {
    classifier: SentimentClassifier,
}

impl ContextFusion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuses a full current distribution with the window and the message.
    pub fn fuse(
        &self,
        current: Option<&EmotionVector>,
        window: &[EmotionVector],
        message: &str,
    ) -> ContextSnapshot {
        self.fuse_with_label(current.map(EmotionVector::dominant), window, message)
    }

    /// Fuses an already-extracted dominant label with the window and the
    /// message. This is the form transports use: clients send the label of
    /// their latest reading alongside the message rather than the full
    /// distribution.
    pub fn fuse_with_label(
        &self,
        current: Option<EmotionLabel>,
        window: &[EmotionVector],
        message: &str,
    ) -> ContextSnapshot {
        ContextSnapshot {
            current_facial_emotion: current,
            recent_facial_pattern: Self::window_pattern(window),
            textual_category: self.classifier.classify(message),
        }
    }

    /// Mode of the dominant labels over the last [`PATTERN_WINDOW`] window
    /// entries (the window is most-recent-last).
    ///
    /// Frequency ties go to the label whose latest occurrence is most
    /// recent. `None` on an empty window.
    fn window_pattern(window: &[EmotionVector]) -> Option<EmotionLabel> {
        let start = window.len().saturating_sub(PATTERN_WINDOW);
        let dominants: Vec<EmotionLabel> =
            window[start..].iter().map(EmotionVector::dominant).collect();

        let mut best: Option<(EmotionLabel, usize, usize)> = None;
        for (index, &label) in dominants.iter().enumerate() {
            let count = dominants.iter().filter(|&&other| other == label).count();
            let replaces = match best {
                Some((_, best_count, best_index)) => (count, index) > (best_count, best_index),
                None => true,
            };
            if replaces {
                best = Some((label, count, index));
            }
        }
        best.map(|(label, _, _)| label)
    }
}
