//! Prompt assembly for the generative path.

use solace_core::generation::{GenerationPrompt, PromptMessage};
use solace_core::sentiment::ContextSnapshot;
use solace_core::session::{ConversationTurn, TurnRole};

/// How many trailing conversation turns are carried into the prompt.
pub const HISTORY_TURN_LIMIT: usize = 10;

/// The fixed therapeutic-guideline preamble sent as system instructions.
const THERAPEUTIC_PREAMBLE: &str = "You are a compassionate, empathetic AI mental health support assistant. Your role is to:

1. Provide emotional support and validation
2. Use reflective listening techniques
3. Ask open-ended questions to help users explore their feelings
4. Show empathy and understanding without judgment
5. Encourage users to express themselves safely
6. Recognize when professional help may be needed
7. Never diagnose or provide medical advice
8. Use warm, supportive, and professional language

Guidelines:
- Acknowledge the user's feelings first
- Use \"I\" statements when appropriate
- Avoid giving direct advice; instead, help users find their own solutions
- Be patient and allow silence/processing time
- Validate emotions without minimizing them
- Use therapeutic techniques like reflection, reframing, and normalization

Remember: You are not a replacement for professional therapy, but you can provide supportive listening and emotional validation.";

/// Appended when the snapshot's textual category is crisis.
///
/// The arbitrator routes crisis messages to the fixed pool instead of
/// generation, so the normal flow never reaches this block; it stays so the
/// prompt contract holds for any direct caller of the generative path.
const CRISIS_ALERT: &str = "\n\n⚠️ CRISIS DETECTED: The user may be in crisis. Respond with immediate concern, validation, and provide crisis resources. Be supportive but also encourage professional help.";

/// Builds generation prompts from the fused context and trailing history.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assembles the prompt: preamble, natural-language context hints, up to
    /// the last [`HISTORY_TURN_LIMIT`] turns oldest-first, then the user's
    /// new message.
    pub fn build(
        &self,
        message: &str,
        snapshot: &ContextSnapshot,
        history: &[ConversationTurn],
    ) -> GenerationPrompt {
        let mut system = String::from(THERAPEUTIC_PREAMBLE);

        if snapshot.current_facial_emotion.is_some() || snapshot.recent_facial_pattern.is_some() {
            system.push_str("\n\nUser's current emotional state: ");
            if let Some(current) = snapshot.current_facial_emotion {
                system.push_str(&format!("detected emotion: {}. ", current));
            }
            if let Some(pattern) = snapshot.recent_facial_pattern {
                system.push_str(&format!("Recent emotional pattern: {}. ", pattern));
            }
        }

        if snapshot.textual_category.is_crisis() {
            system.push_str(CRISIS_ALERT);
        }

        let start = history.len().saturating_sub(HISTORY_TURN_LIMIT);
        let mut messages: Vec<PromptMessage> = history[start..]
            .iter()
            .map(|turn| PromptMessage::new(turn.role, turn.content.clone()))
            .collect();
        messages.push(PromptMessage::new(TurnRole::User, message));

        GenerationPrompt { system, messages }
    }
}
