//! Core domain types for the Solace engine.
//!
//! This crate defines the emotion and sentiment domain model, the
//! conversation/session types, the collaborator trait boundaries
//! ([`session::SessionStore`], [`generation::TextGenerator`],
//! [`vision::FaceLocalizer`], [`vision::FaceEmotionEstimator`]) and the
//! error taxonomy. It holds no behavior beyond pure domain logic; the
//! components that act on these types live in `solace-engine`.

pub mod emotion;
pub mod error;
pub mod generation;
pub mod sentiment;
pub mod session;
pub mod vision;

// Re-export common error types
pub use error::{Result, SolaceError, StoreError};
