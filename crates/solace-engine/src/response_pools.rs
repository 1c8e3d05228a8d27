//! Fixed response pools and the randomness source that picks from them.
//!
//! Pool wording is part of the safety contract: crisis entries are
//! pre-approved and each names at least one immediate-help resource, and
//! mismatch entries each carry an `{emotion}` placeholder so the delivered
//! text always names the detected emotion. Nothing in this module is ever
//! delegated to generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solace_core::emotion::EmotionLabel;
use std::sync::Mutex;

/// Crisis-safety replies. Every entry references an immediate-help resource
/// (988 lifeline, 741741 text line, or 911).
pub const CRISIS_RESPONSES: [&str; 3] = [
    "I'm really concerned about what you're sharing. Your life has value, and there are people who want to help. Please reach out to a crisis helpline right now: National Suicide Prevention Lifeline at 988, or Crisis Text Line by texting HOME to 741741. You don't have to go through this alone.",
    "I hear that you're in a lot of pain right now, and I'm worried about you. Please know that there is help available. If you're in immediate danger, please call 911 or go to your nearest emergency room. You can also call the National Suicide Prevention Lifeline at 988 - they're available 24/7.",
    "Thank you for sharing this with me. I want you to know that your feelings are valid, but I'm very concerned about your safety. Please reach out for immediate professional help. Call 988 (Suicide Prevention Lifeline) or 911 if you're in immediate danger. There are people trained to help you through this.",
];

/// Greeting replies.
pub const GREETING_RESPONSES: [&str; 3] = [
    "Hello. I'm here to listen and support you. How are you feeling today? You can share whatever's on your mind, and I'll be here with you.",
    "Hi there. Thank you for reaching out. I'm here to provide a safe space for you to express yourself. What's on your mind today?",
    "Hello. I'm glad you're here. This is a judgment-free space where you can share your thoughts and feelings. How are you doing today?",
];

/// Stress and anxiety replies.
pub const STRESS_RESPONSES: [&str; 3] = [
    "I can hear that you're feeling stressed right now. That sounds really difficult. Can you tell me more about what's contributing to these feelings?",
    "It sounds like you're experiencing a lot of pressure. That must be overwhelming. What would help you feel a bit more grounded right now?",
    "I understand that stress can feel consuming. You're not alone in feeling this way. What's one thing that's been weighing on you the most?",
];

/// Sadness replies.
pub const SADNESS_RESPONSES: [&str; 3] = [
    "I hear the sadness in what you're sharing. Thank you for trusting me with these feelings. Can you help me understand what's been making you feel this way?",
    "It sounds like you're going through a really tough time. Your feelings are valid, and I'm here to listen. What's been on your mind lately?",
    "I can sense that you're feeling down. That must be really hard. Would you like to talk about what's been contributing to these feelings?",
];

/// Anger replies.
pub const ANGER_RESPONSES: [&str; 3] = [
    "I can hear the frustration in your words. It sounds like something has really upset you. Can you help me understand what happened?",
    "It seems like you're feeling angry, and that's completely understandable. What's been making you feel this way?",
    "I hear that you're frustrated. Those feelings are valid. Would you like to talk about what's been bothering you?",
];

/// Fear replies.
pub const FEAR_RESPONSES: [&str; 3] = [
    "I can sense that you're feeling afraid or worried. That must be really unsettling. Can you tell me more about what's causing these feelings?",
    "It sounds like fear is really present for you right now. That's a difficult emotion to sit with. What would help you feel a bit safer?",
    "I hear that you're feeling scared. Thank you for sharing that with me. What's been making you feel this way?",
];

/// Mismatch-acknowledgment replies for when stated and observed affect
/// disagree. Every entry contains `{emotion}`.
pub const MISMATCH_RESPONSES: [&str; 3] = [
    "I hear you say you're doing okay, and I want to respect that. I'm also noticing that you might be feeling {emotion} right now. Sometimes it can be hard to put words to our feelings. Would you like to talk about what's going on?",
    "Thank you for sharing. I want to acknowledge that sometimes our words and our feelings don't always match up, and that's okay. I'm noticing you might be feeling {emotion} right now. If you'd like to explore what you're experiencing, I'm here to listen.",
    "I hear you, and I also notice there might be more going on beneath the surface. You seem to be feeling {emotion}. Would you like to talk about what you're really feeling right now?",
];

/// The fixed probe for messages that talk about feelings directly.
pub const FEELINGS_PROBE: &str = "I appreciate you sharing how you're feeling. Can you tell me more about what's behind these feelings? Sometimes exploring them can help us understand ourselves better.";

/// The lighter-weight reply for very short messages.
pub const SHORT_MESSAGE_RESPONSE: &str =
    "I'm listening. Can you tell me more about what's on your mind?";

/// Default reflective-listening replies.
pub const REFLECTIVE_RESPONSES: [&str; 8] = [
    "Thank you for sharing that with me. It sounds like that's been really significant for you. Can you help me understand more about how that's been affecting you?",
    "I hear what you're saying. It sounds like this is something that's been on your mind. Can you tell me more about what that's been like for you?",
    "That sounds really important to you. What's it been like for you to experience that?",
    "I appreciate you opening up about this. How have you been coping with these feelings?",
    "It sounds like this has been weighing on you. What would it mean for you if things were different?",
    "I'm listening, and I want to make sure I understand. Can you help me see this from your perspective?",
    "That sounds challenging. What's been the hardest part about this for you?",
    "Thank you for trusting me with this. What do you think might help you feel a bit better?",
];

/// Picks pool entries through an injectable RNG so tests can pin choices.
///
/// Defaults to system entropy; [`with_seed`](Self::with_seed) gives
/// deterministic sequences.
#[derive(Debug)]
pub struct ResponseSelector {
    rng: Mutex<StdRng>,
}

impl ResponseSelector {
    /// Selector seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Picks one entry from `pool`.
    ///
    /// # Panics
    ///
    /// Panics on an empty pool; every pool in this module is a non-empty
    /// constant.
    pub fn pick<'a>(&self, pool: &[&'a str]) -> &'a str {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        pool[rng.gen_range(0..pool.len())]
    }

    /// Picks a mismatch reply with the detected emotion substituted in.
    pub fn mismatch_response(&self, emotion: EmotionLabel) -> String {
        self.pick(&MISMATCH_RESPONSES)
            .replace("{emotion}", emotion.as_str())
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_crisis_reply_names_a_resource() {
        for reply in CRISIS_RESPONSES {
            assert!(
                reply.contains("988") || reply.contains("741741") || reply.contains("911"),
                "crisis reply without an immediate-help resource: {}",
                reply
            );
        }
    }

    #[test]
    fn test_every_mismatch_reply_has_the_placeholder() {
        for reply in MISMATCH_RESPONSES {
            assert!(reply.contains("{emotion}"));
        }
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let first = ResponseSelector::with_seed(7);
        let second = ResponseSelector::with_seed(7);

        for _ in 0..20 {
            assert_eq!(
                first.pick(&REFLECTIVE_RESPONSES),
                second.pick(&REFLECTIVE_RESPONSES)
            );
        }
    }

    #[test]
    fn test_pick_stays_inside_the_pool() {
        let selector = ResponseSelector::with_seed(42);

        for _ in 0..50 {
            let choice = selector.pick(&GREETING_RESPONSES);
            assert!(GREETING_RESPONSES.contains(&choice));
        }
    }

    #[test]
    fn test_mismatch_response_names_the_emotion() {
        let selector = ResponseSelector::with_seed(3);

        let text = selector.mismatch_response(EmotionLabel::Sad);

        assert!(text.contains("sad"));
        assert!(!text.contains("{emotion}"));
    }
}
