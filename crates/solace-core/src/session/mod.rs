//! Session domain module.
//!
//! # Module Structure
//!
//! - `turn`: conversation turn types (`TurnRole`, `ConversationTurn`)
//! - `stats`: stored-activity aggregates (`SessionStats`, `EmotionOccurrence`)
//! - `store`: the persistence contract (`SessionStore`)

mod stats;
mod store;
mod turn;

// Re-export public API
pub use stats::{EmotionOccurrence, SessionStats};
pub use store::SessionStore;
pub use turn::{ConversationTurn, TurnRole};
