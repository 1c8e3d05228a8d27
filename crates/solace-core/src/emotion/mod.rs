//! Emotion domain module.
//!
//! # Module Structure
//!
//! - `label`: the closed emotion label set (`EmotionLabel`)
//! - `vector`: normalized distributions (`EmotionVector`, `RawEmotionScores`)
//! - `reading`: detection results with metadata (`EmotionReading`, `FaceRegion`)

mod label;
mod reading;
mod vector;

// Re-export public API
pub use label::EmotionLabel;
pub use reading::{EmotionReading, FaceRegion};
pub use vector::{EmotionVector, RawEmotionScores};
