//! Engine layer for Solace.
//!
//! This crate fuses facial, conversational, and textual emotion signals and
//! arbitrates responses between a generative backend and rule-based
//! templates, coordinating persistence through the core session store trait.

pub mod aggregator;
pub mod arbitrator;
pub mod chat_service;
pub mod detection_service;
pub mod emotion_history;
pub mod fusion;
pub mod prompt;
pub mod response_pools;
pub mod sentiment;

pub use aggregator::EmotionAggregator;
pub use arbitrator::{
    ArbitratedResponse, DEFAULT_GENERATION_TIMEOUT, ResponseArbitrator, ResponsePath,
};
pub use chat_service::{ChatReply, ChatRequest, ChatService};
pub use detection_service::EmotionDetectionService;
pub use emotion_history::{EmotionHistoryCache, RETAINED_PER_SESSION};
pub use fusion::{ContextFusion, PATTERN_WINDOW};
pub use prompt::{HISTORY_TURN_LIMIT, PromptBuilder};
pub use response_pools::ResponseSelector;
pub use sentiment::SentimentClassifier;
