//! Error types for the FallSense core.
//!
//! Malformed keypoint input must fail fast with a distinguishable error
//! rather than silently misclassify. A single bad frame is a recoverable
//! condition: the caller skips the frame, and no tracker state is touched.

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced while validating upstream keypoint data.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// The keypoint array does not have exactly one entry per COCO landmark.
    #[error("Invalid keypoint count: expected {expected}, got {actual}")]
    InvalidKeypointCount {
        /// Expected number of keypoints
        expected: usize,
        /// Actual number of keypoints received
        actual: usize,
    },

    /// A keypoint coordinate is NaN or infinite.
    #[error("Non-finite coordinate for {keypoint}: ({x}, {y})")]
    NonFiniteCoordinate {
        /// Name of the offending keypoint
        keypoint: &'static str,
        /// X coordinate as received
        x: f32,
        /// Y coordinate as received
        y: f32,
    },

    /// Validation error for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },
}

impl CoreError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// All input-validation errors are recoverable: the caller drops the
    /// offending frame and continues with the next one.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidKeypointCount { .. }
            | Self::NonFiniteCoordinate { .. }
            | Self::Validation { .. } => true,
        }
    }
}
