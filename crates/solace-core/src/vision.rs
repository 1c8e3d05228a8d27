//! Frame input and the face-analysis collaborator boundaries.

use crate::emotion::{FaceRegion, RawEmotionScores};
use crate::error::SolaceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A decoded pixel buffer handed to the detection service.
///
/// Decoding from a wire format happens outside the engine; the per-pixel
/// byte layout is backend-defined. The engine only checks structural
/// consistency before handing the frame to collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Rejects structurally malformed frames.
    ///
    /// The per-pixel byte count is backend-defined, so the checks are:
    /// non-zero dimensions, a non-empty buffer, and a buffer length that is a
    /// whole multiple of `width * height`.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SolaceError::invalid_input(format!(
                "frame has degenerate dimensions {}x{}",
                self.width, self.height
            )));
        }
        if self.pixels.is_empty() {
            return Err(SolaceError::invalid_input("frame has an empty pixel buffer"));
        }
        let pixel_count = self.width as usize * self.height as usize;
        if self.pixels.len() % pixel_count != 0 {
            return Err(SolaceError::invalid_input(format!(
                "pixel buffer of {} bytes does not cover {}x{} evenly",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// Failures from face-analysis collaborators.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DetectionError {
    /// The frame is unusable for this backend
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Backend-internal failure
    #[error("Detection backend error: {0}")]
    Backend(String),
}

/// Finds faces in a frame.
pub trait FaceLocalizer: Send + Sync {
    /// Returns bounding boxes for every face found in `frame`; an empty
    /// result is the defined no-face case, not an error.
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceRegion>, DetectionError>;
}

/// Scores emotions for one located face.
pub trait FaceEmotionEstimator: Send + Sync {
    /// Produces raw per-label scores for the face at `region`.
    ///
    /// Scores are non-negative and need not be normalized; sparse maps are
    /// fine (missing labels read as zero).
    fn estimate(
        &self,
        frame: &Frame,
        region: &FaceRegion,
    ) -> Result<RawEmotionScores, DetectionError>;
}
