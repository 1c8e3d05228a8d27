//! Response arbitration between the generative and rule-based paths.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use solace_core::emotion::EmotionLabel;
use solace_core::generation::{GenerationError, TextGenerator};
use solace_core::sentiment::{ContextSnapshot, SentimentCategory};
use solace_core::session::ConversationTurn;

use crate::prompt::PromptBuilder;
use crate::response_pools::{
    ANGER_RESPONSES, CRISIS_RESPONSES, FEAR_RESPONSES, FEELINGS_PROBE, GREETING_RESPONSES,
    REFLECTIVE_RESPONSES, ResponseSelector, SADNESS_RESPONSES, SHORT_MESSAGE_RESPONSE,
    STRESS_RESPONSES,
};

/// Upper bound on a single generation attempt before falling back to rules.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

const GENERATION_MAX_TOKENS: u32 = 300;
const GENERATION_TEMPERATURE: f32 = 0.7;

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(hello|hi|hey|start|begin)\b").expect("greeting regex must compile")
});

static SELF_REPORT_OKAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(fine|okay|ok)\b").expect("self-report regex must compile"));

/// Which path produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePath {
    /// Crisis override from the fixed safety pool.
    Crisis,
    /// Text produced by the configured generator.
    Generative,
    /// Keyword and template rules.
    RuleBased,
}

/// The arbitrated reply together with routing facts the caller surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitratedResponse {
    pub text: String,
    pub crisis_detected: bool,
    pub path: ResponsePath,
}

/// Routes a user message to the crisis pool, the generative backend, or the
/// rule-based templates.
///
/// Crisis always wins. The generative path is attempted only when a generator
/// is configured, and any failure there degrades to the rule-based path so the
/// caller always receives a response.
pub struct ResponseArbitrator {
    /// Generative backend. `None` runs the arbitrator rule-based only.
    generator: Option<Arc<dyn TextGenerator>>,
    /// Assembles system instructions and trailing history for generation.
    prompt_builder: PromptBuilder,
    /// Pool selection, seedable for deterministic tests.
    selector: ResponseSelector,
    /// Deadline for one generation attempt.
    generation_timeout: Duration,
}

impl ResponseArbitrator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            prompt_builder: PromptBuilder::new(),
            selector: ResponseSelector::new(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// An arbitrator that never attempts generation.
    pub fn rule_based_only() -> Self {
        Self::new(None)
    }

    pub fn with_selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Produces a response for `message` under the fused `snapshot`.
    ///
    /// `history` is the trailing conversation before this message, oldest
    /// first. It feeds the generative prompt only; the rule-based path looks
    /// at the current message alone.
    pub async fn respond(
        &self,
        message: &str,
        snapshot: &ContextSnapshot,
        history: &[ConversationTurn],
    ) -> ArbitratedResponse {
        if snapshot.textual_category.is_crisis() {
            return ArbitratedResponse {
                text: self.selector.pick(&CRISIS_RESPONSES).to_string(),
                crisis_detected: true,
                path: ResponsePath::Crisis,
            };
        }

        if let Some(generator) = &self.generator {
            match self
                .attempt_generation(generator.as_ref(), message, snapshot, history)
                .await
            {
                Ok(text) => {
                    return ArbitratedResponse {
                        text,
                        crisis_detected: false,
                        path: ResponsePath::Generative,
                    };
                }
                Err(err) => {
                    tracing::warn!(
                        "[ResponseArbitrator] Generation failed, falling back to rules: {}",
                        err
                    );
                }
            }
        }

        ArbitratedResponse {
            text: self.rule_based_response(message, snapshot),
            crisis_detected: false,
            path: ResponsePath::RuleBased,
        }
    }

    async fn attempt_generation(
        &self,
        generator: &dyn TextGenerator,
        message: &str,
        snapshot: &ContextSnapshot,
        history: &[ConversationTurn],
    ) -> Result<String, GenerationError> {
        let prompt = self.prompt_builder.build(message, snapshot, history);
        let completion = tokio::time::timeout(
            self.generation_timeout,
            generator.generate(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE),
        )
        .await
        .map_err(|_| GenerationError::Timeout {
            elapsed: self.generation_timeout,
        })??;

        let trimmed = completion.trim();
        if trimmed.is_empty() {
            return Err(GenerationError::malformed("empty completion"));
        }
        Ok(trimmed.to_string())
    }

    // =========================================================================
    // Rule-based path
    // =========================================================================

    /// Applies the template rules in fixed precedence: greeting, emotion
    /// category, feelings probe, short message, facial mismatch, reflective
    /// fallback.
    fn rule_based_response(&self, message: &str, snapshot: &ContextSnapshot) -> String {
        let lower = message.to_lowercase();

        if GREETING_RE.is_match(&lower) {
            return self.selector.pick(&GREETING_RESPONSES).to_string();
        }

        if let Some(pool) = category_pool(&lower, snapshot.textual_category) {
            return self.selector.pick(pool).to_string();
        }

        if lower.contains("feel") || lower.contains("emotion") {
            return FEELINGS_PROBE.to_string();
        }

        if message.split_whitespace().count() < 5 {
            return SHORT_MESSAGE_RESPONSE.to_string();
        }

        if let Some(current) = snapshot.current_facial_emotion {
            if current != EmotionLabel::Neutral && SELF_REPORT_OKAY_RE.is_match(&lower) {
                return self.selector.mismatch_response(current);
            }
        }

        self.selector.pick(&REFLECTIVE_RESPONSES).to_string()
    }
}

/// Picks the template pool for the classified category, widened by direct
/// keyword hits so a plainly worded message lands in its pool even when the
/// classifier scored another category higher.
fn category_pool(lower: &str, category: SentimentCategory) -> Option<&'static [&'static str]> {
    if category == SentimentCategory::Stress
        || lower.contains("stressed")
        || lower.contains("anxious")
    {
        return Some(&STRESS_RESPONSES);
    }
    if category == SentimentCategory::Sadness
        || lower.contains("sad")
        || lower.contains("depressed")
    {
        return Some(&SADNESS_RESPONSES);
    }
    if category == SentimentCategory::Anger
        || lower.contains("angry")
        || lower.contains("frustrated")
    {
        return Some(&ANGER_RESPONSES);
    }
    if category == SentimentCategory::Fear || lower.contains("afraid") || lower.contains("scared") {
        return Some(&FEAR_RESPONSES);
    }
    None
}
