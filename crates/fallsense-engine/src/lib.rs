//! # FallSense Engine
//!
//! Pose-based fall classification and temporal confirmation.
//!
//! The engine consumes per-frame COCO-17 keypoints for tracked persons
//! and produces two things: an instantaneous posture label per frame, and
//! a debounced confirmed-fall signal once a person has been lying
//! continuously for the configured duration.
//!
//! ## Architecture
//!
//! ```text
//! keypoints ──> PoseClassifier ──label──> FallTracker ──> FrameAssessment
//!               (stateless geometry)      (per-person timing,
//!                                          bounded memory)
//! ```
//!
//! - [`classifier`]: pure geometric posture classification
//! - [`tracking`]: lying-episode timing, confirmation, and eviction
//! - [`events`]: confirmed-fall event records
//! - [`engine`]: the [`FallEngine`] facade combining all of the above
//!
//! Pose estimation, person tracking across frames, and alert dispatch are
//! upstream and downstream concerns; this crate starts at keypoints and
//! ends at events.
//!
//! ## Example
//!
//! ```rust
//! use fallsense_engine::{FallEngine, PersonId, Timestamp};
//!
//! let engine = FallEngine::with_defaults();
//!
//! // A horizontal body, repeated past the confirmation window.
//! let mut pairs = vec![(1.0, 1.0); 17];
//! for (i, p) in [(5, (50.0, 100.0)), (6, (50.0, 110.0)),
//!                (11, (150.0, 100.0)), (12, (150.0, 110.0)),
//!                (13, (158.0, 100.0)), (14, (158.0, 110.0)),
//!                (15, (165.0, 100.0)), (16, (165.0, 110.0))] {
//!     pairs[i] = p;
//! }
//!
//! let person = PersonId::new(7);
//! let first = engine.process(person, &pairs, Timestamp::from_secs_f64(0.0)).unwrap();
//! assert!(!first.fall_confirmed);
//!
//! let later = engine.process(person, &pairs, Timestamp::from_secs_f64(2.0)).unwrap();
//! assert!(later.fall_confirmed);
//! assert!(later.event.is_some());
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod classifier;
pub mod engine;
pub mod events;
pub mod tracking;

// Re-export commonly used types at the crate root
pub use classifier::{ClassifierConfig, PoseClassifier, PoseFeatures};
pub use engine::{EngineConfig, EngineConfigBuilder, FallEngine, FrameAssessment};
pub use events::{FallEvent, FallEventId};
pub use fallsense_core::{KeypointSet, KeypointType, PersonId, PostureLabel, Timestamp};
pub use tracking::{FallTracker, TrackOutcome, TrackerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors from the fall detection engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A frame's keypoints failed validation
    #[error("invalid frame input: {0}")]
    Input(#[from] fallsense_core::CoreError),

    /// A configuration value is out of range
    #[error("invalid configuration: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if the error concerns one frame rather than the
    /// engine itself; callers can drop the frame and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Input(_) => true,
            Self::Config { .. } => false,
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Prelude module for convenient imports.
///
/// ```rust
/// use fallsense_engine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classifier::{ClassifierConfig, PoseClassifier, PoseFeatures};
    pub use crate::engine::{EngineConfig, FallEngine, FrameAssessment};
    pub use crate::events::{FallEvent, FallEventId};
    pub use crate::tracking::{FallTracker, TrackOutcome, TrackerConfig};
    pub use crate::{EngineError, EngineResult};
    pub use fallsense_core::prelude::*;
}
