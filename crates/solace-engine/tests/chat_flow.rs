use async_trait::async_trait;
use solace_core::emotion::{EmotionLabel, EmotionReading, EmotionVector};
use solace_core::generation::{GenerationError, GenerationPrompt, TextGenerator};
use solace_core::session::{SessionStore, TurnRole};
use solace_engine::response_pools::{CRISIS_RESPONSES, STRESS_RESPONSES};
use solace_engine::{ChatRequest, ChatService, EmotionHistoryCache, ResponseArbitrator};
use solace_infrastructure::MemorySessionStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every prompt it is asked to complete.
struct CapturingGenerator {
    prompts: Mutex<Vec<GenerationPrompt>>,
}

impl CapturingGenerator {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for CapturingGenerator {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok("Generated supportive reply.".to_string())
    }
}

/// Fails every call as if the backend deadline had passed.
struct TimingOutGenerator;

#[async_trait]
impl TextGenerator for TimingOutGenerator {
    async fn generate(
        &self,
        _prompt: &GenerationPrompt,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Timeout {
            elapsed: Duration::from_secs(30),
        })
    }
}

fn rule_based_service(store: Arc<MemorySessionStore>) -> ChatService {
    ChatService::new(
        store,
        ResponseArbitrator::rule_based_only(),
        Arc::new(EmotionHistoryCache::new()),
    )
}

fn generative_service(
    store: Arc<MemorySessionStore>,
    generator: Arc<CapturingGenerator>,
) -> ChatService {
    ChatService::new(
        store,
        ResponseArbitrator::new(Some(generator)),
        Arc::new(EmotionHistoryCache::new()),
    )
}

#[tokio::test]
async fn test_first_turn_creates_a_session_and_persists_both_sides() {
    let store = Arc::new(MemorySessionStore::new());
    let service = rule_based_service(store.clone());

    let reply = service
        .respond(&ChatRequest::new("hello"))
        .await
        .expect("Should answer the first turn");

    assert!(!reply.session_id.is_empty(), "Should mint a session id");
    assert!(!reply.crisis_detected);

    let turns = store
        .read_turns(&reply.session_id, 10)
        .await
        .expect("Should read the transcript back");
    assert_eq!(turns.len(), 2, "Should persist the user and assistant turns");
    assert_eq!(turns[0].role, TurnRole::User);
    assert_eq!(turns[0].content, "hello");
    assert_eq!(turns[1].role, TurnRole::Assistant);
    assert_eq!(turns[1].content, reply.response_text);
}

#[tokio::test]
async fn test_second_turn_continues_the_same_session() {
    let store = Arc::new(MemorySessionStore::new());
    let service = rule_based_service(store.clone());

    let first = service
        .respond(&ChatRequest::new("hello"))
        .await
        .expect("Should answer the first turn");
    let second = service
        .respond(&ChatRequest::new("hello again").with_session(first.session_id.clone()))
        .await
        .expect("Should answer the second turn");

    assert_eq!(first.session_id, second.session_id);

    let turns = store
        .read_turns(&first.session_id, 10)
        .await
        .expect("Should read the transcript back");
    assert_eq!(turns.len(), 4, "Should hold both exchanges");
    assert_eq!(turns[2].content, "hello again");
}

#[tokio::test]
async fn test_unknown_session_id_is_rejected() {
    let service = rule_based_service(Arc::new(MemorySessionStore::new()));

    let result = service
        .respond(&ChatRequest::new("hello").with_session("no-such-session"))
        .await;

    let err = result.expect_err("Should refuse an unknown session id");
    assert!(err.is_session_not_found());
}

#[tokio::test]
async fn test_crisis_message_is_flagged_and_answered_from_the_pool() {
    let store = Arc::new(MemorySessionStore::new());
    let service = rule_based_service(store.clone());

    let reply = service
        .respond(&ChatRequest::new("I want to end it all"))
        .await
        .expect("Should answer a crisis turn");

    assert!(reply.crisis_detected, "Should flag the crisis");
    assert!(
        CRISIS_RESPONSES.contains(&reply.response_text.as_str()),
        "Should answer from the fixed crisis pool"
    );

    // The exchange is still persisted like any other turn.
    let turns = store
        .read_turns(&reply.session_id, 10)
        .await
        .expect("Should read the transcript back");
    assert_eq!(turns.len(), 2);
}

#[tokio::test]
async fn test_generation_timeout_falls_back_to_the_matching_rule_pool() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ChatService::new(
        store,
        ResponseArbitrator::new(Some(Arc::new(TimingOutGenerator))),
        Arc::new(EmotionHistoryCache::new()),
    );

    let reply = service
        .respond(&ChatRequest::new("I'm stressed about work"))
        .await
        .expect("Should still answer when the generator times out");

    assert!(!reply.crisis_detected);
    assert!(
        STRESS_RESPONSES.contains(&reply.response_text.as_str()),
        "Should fall back to the stress pool, got: {}",
        reply.response_text
    );
}

#[tokio::test]
async fn test_generative_prompt_carries_history_without_duplicating_the_message() {
    let store = Arc::new(MemorySessionStore::new());
    let generator = Arc::new(CapturingGenerator::new());
    let service = generative_service(store, generator.clone());

    let first = service
        .respond(&ChatRequest::new("hello"))
        .await
        .expect("Should answer the first turn");
    service
        .respond(&ChatRequest::new("I had a rough day at work").with_session(first.session_id))
        .await
        .expect("Should answer the second turn");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);

    // Second prompt: the first exchange as history, then the new message once.
    let second = &prompts[1];
    assert_eq!(second.messages.len(), 3);
    assert_eq!(second.messages[0].role, TurnRole::User);
    assert_eq!(second.messages[0].content, "hello");
    assert_eq!(second.messages[1].role, TurnRole::Assistant);
    assert_eq!(second.messages[1].content, "Generated supportive reply.");
    assert_eq!(second.messages[2].role, TurnRole::User);
    assert_eq!(second.messages[2].content, "I had a rough day at work");
}

#[tokio::test]
async fn test_facial_context_reaches_the_generative_prompt() {
    let store = Arc::new(MemorySessionStore::new());
    let generator = Arc::new(CapturingGenerator::new());
    let service = generative_service(store.clone(), generator.clone());

    let session_id = store
        .create_session()
        .await
        .expect("Should create a session");
    for _ in 0..3 {
        let reading = EmotionReading::from_vector(
            EmotionVector::single(EmotionLabel::Sad),
            Vec::new(),
        );
        store
            .append_emotion_log(&session_id, &reading)
            .await
            .expect("Should log the reading");
    }

    service
        .respond(
            &ChatRequest::new("Today was one of those days again")
                .with_session(session_id)
                .with_current_emotion(EmotionLabel::Angry),
        )
        .await
        .expect("Should answer the turn");

    let prompts = generator.prompts.lock().unwrap();
    let system = &prompts[0].system;
    assert!(system.contains("detected emotion: angry. "));
    assert!(system.contains("Recent emotional pattern: sad. "));
}

#[tokio::test]
async fn test_emotion_history_and_stats_read_back() {
    let store = Arc::new(MemorySessionStore::new());
    let service = rule_based_service(store.clone());

    let session_id = service
        .create_session()
        .await
        .expect("Should create a session");
    for _ in 0..2 {
        let reading = EmotionReading::from_vector(
            EmotionVector::single(EmotionLabel::Sad),
            Vec::new(),
        );
        store
            .append_emotion_log(&session_id, &reading)
            .await
            .expect("Should log the reading");
    }
    service
        .respond(&ChatRequest::new("hello").with_session(session_id.clone()))
        .await
        .expect("Should answer the turn");

    let vectors = service
        .emotion_history(&session_id, 10)
        .await
        .expect("Should read the emotion log");
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0].dominant(), EmotionLabel::Sad);

    let stats = service
        .stats(&session_id)
        .await
        .expect("Should compute stats");
    assert_eq!(stats.session_id, session_id);
    assert_eq!(stats.message_count, 2, "Should count both persisted turns");
    let sad = stats
        .emotion_distribution
        .get(&EmotionLabel::Sad)
        .expect("Should track the sad readings");
    assert_eq!(sad.count, 2);
}
