//! Keyword-driven sentiment classification.

use solace_core::sentiment::SentimentCategory;

/// Keywords indicating stress or anxiety.
const STRESS_KEYWORDS: &[&str] = &[
    "stressed",
    "overwhelmed",
    "pressure",
    "anxious",
    "worried",
    "panic",
    "tension",
    "nervous",
    "worries",
    "stressing",
    "overwhelm",
];

/// Keywords indicating sadness or depression.
const SADNESS_KEYWORDS: &[&str] = &[
    "sad",
    "depressed",
    "down",
    "hopeless",
    "empty",
    "lonely",
    "miserable",
    "unhappy",
    "sorrow",
    "grief",
    "melancholy",
    "blue",
    "downhearted",
];

/// Keywords indicating anger or frustration.
const ANGER_KEYWORDS: &[&str] = &[
    "angry",
    "furious",
    "mad",
    "frustrated",
    "annoyed",
    "irritated",
    "rage",
    "livid",
    "enraged",
    "resentful",
    "bitter",
    "hostile",
];

/// Keywords indicating fear. Several overlap with the stress list on
/// purpose; ties resolve through the fixed category priority.
const FEAR_KEYWORDS: &[&str] = &[
    "afraid",
    "scared",
    "fear",
    "terrified",
    "worried",
    "nervous",
    "anxious",
    "panic",
    "dread",
    "apprehensive",
    "frightened",
    "intimidated",
];

/// Crisis phrases, multi-word included. Matched as raw substrings: partial
/// hits inside longer words over-trigger, which is the safety-conservative
/// failure mode and stays as is.
const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "want to die",
    "hurt myself",
    "self harm",
    "cutting",
    "overdose",
    "no point",
    "give up",
    "end my life",
];

/// Non-crisis categories with their vocabularies, in tie-break priority
/// order: stress beats sadness beats anger beats fear.
const SCORED_CATEGORIES: [(SentimentCategory, &[&str]); 4] = [
    (SentimentCategory::Stress, STRESS_KEYWORDS),
    (SentimentCategory::Sadness, SADNESS_KEYWORDS),
    (SentimentCategory::Anger, ANGER_KEYWORDS),
    (SentimentCategory::Fear, FEAR_KEYWORDS),
];

/// Assigns exactly one [`SentimentCategory`] to a message.
///
/// Pure function over the message text: no I/O, no state, fully
/// deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentClassifier;

impl SentimentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies `message`.
    ///
    /// Any crisis phrase returns `Crisis` before and regardless of every
    /// other category's count; crisis must never be masked by a numerically
    /// larger hit count elsewhere. Otherwise the category with the most
    /// distinct keyword hits wins, ties broken by the fixed priority order,
    /// and zero hits everywhere means `Neutral`.
    pub fn classify(&self, message: &str) -> SentimentCategory {
        let lower = message.to_lowercase();

        if CRISIS_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return SentimentCategory::Crisis;
        }

        let mut best = SentimentCategory::Neutral;
        let mut best_hits = 0usize;
        for (category, keywords) in SCORED_CATEGORIES {
            let hits = keywords
                .iter()
                .copied()
                .filter(|word| lower.contains(word))
                .count();
            if hits > best_hits {
                best = category;
                best_hits = hits;
            }
        }
        best
    }
}
