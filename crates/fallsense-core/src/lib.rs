//! # FallSense Core
//!
//! Core types and geometry for the FallSense fall detection engine.
//!
//! This crate provides the foundational building blocks shared by the
//! FallSense classification pipeline:
//!
//! - **Keypoint Types**: [`KeypointSet`], [`Keypoint`], and
//!   [`KeypointType`] for the COCO-17 skeletons produced per frame by the
//!   upstream pose model.
//!
//! - **Posture Types**: [`PostureLabel`], the closed set of frame-level
//!   posture classifications.
//!
//! - **Error Types**: typed validation errors via the [`error`] module so
//!   malformed frames fail fast instead of misclassifying.
//!
//! - **Geometry**: the scalar 2-D helpers in [`geometry`] used for torso
//!   and knee angle computation, with explicit NaN guards.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization via serde
//!
//! ## Example
//!
//! ```rust
//! use fallsense_core::{KeypointSet, KeypointType};
//!
//! let pairs: Vec<(f32, f32)> = (0..17).map(|i| (i as f32 + 1.0, 100.0)).collect();
//! let set = KeypointSet::from_pairs(&pairs).unwrap();
//!
//! assert!(set.has_critical_keypoints());
//! assert!(!set.is_missing(KeypointType::LeftHip));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{CoreError, CoreResult};
pub use types::{
    Keypoint, KeypointSet, KeypointType, PersonId, PostureLabel, Timestamp,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of keypoints per person (COCO format)
pub const NUM_KEYPOINTS: usize = 17;

/// Prelude module for convenient imports.
///
/// ```rust
/// use fallsense_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::geometry::Vec2;
    pub use crate::types::{
        Keypoint, KeypointSet, KeypointType, PersonId, PostureLabel, Timestamp,
    };
}
