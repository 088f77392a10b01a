//! Instantaneous posture classification from one frame's keypoints.
//!
//! The classifier is a pure function of the keypoint geometry: no state,
//! no side effects, deterministic for identical input. Temporal smoothing
//! and fall confirmation live in the [`crate::tracking`] module.

use fallsense_core::geometry::{angle_between_deg, euclidean_distance, midpoint, Vec2};
use fallsense_core::{KeypointSet, KeypointType, PostureLabel};
use serde::{Deserialize, Serialize};

/// Knee angle below which a non-sitting posture counts as squatting (degrees).
pub const SQUAT_KNEE_ANGLE_DEG: f32 = 100.0;

/// Minimum horizontal ratio of the shoulder-to-ankle span for lying.
pub const LYING_HORIZONTAL_RATIO: f32 = 0.5;

/// Ankle-to-hip distance must be below this fraction of total height for lying.
pub const LYING_ANKLE_HIP_FACTOR: f32 = 0.2;

/// Tunable thresholds for the posture classifier.
///
/// Together with [`crate::tracking::TrackerConfig::fall_duration_secs`],
/// these three thresholds are the entire tunable surface of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Torso angle from vertical at which lying becomes possible (degrees)
    pub fall_threshold_deg: f32,
    /// Torso angle from vertical at which sitting becomes possible (degrees)
    pub sit_threshold_deg: f32,
    /// Hip-height ratio separating chair sitting from floor sitting
    pub chair_height_ratio: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fall_threshold_deg: 45.0,
            sit_threshold_deg: 50.0,
            chair_height_ratio: 0.6,
        }
    }
}

/// Geometric features computed from one keypoint set.
///
/// Exposed so callers can log or display the raw geometry behind a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseFeatures {
    /// Angle of the torso vector from the image "up" direction (degrees)
    pub torso_angle_deg: f32,
    /// Angle between thigh and lower-leg vectors (degrees)
    pub knee_angle_deg: f32,
    /// Hip-to-ankle distance over shoulder-to-ankle distance
    pub hip_height_ratio: f32,
    /// |x| component of the shoulder-to-ankle span over its norm
    pub horizontal_ratio: f32,
    /// Euclidean distance between ankle and hip midpoints (pixels)
    pub ankle_hip_dist: f32,
    /// Euclidean distance between shoulder and ankle midpoints (pixels)
    pub total_height: f32,
}

/// Stateless posture classifier.
#[derive(Debug, Clone)]
pub struct PoseClassifier {
    config: ClassifierConfig,
}

impl PoseClassifier {
    /// Creates a classifier with the provided thresholds.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Creates a classifier with default thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ClassifierConfig::default())
    }

    /// Returns the classifier configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies one frame's keypoints into a posture label.
    ///
    /// Returns [`PostureLabel::Unknown`] when any critical keypoint
    /// (shoulders, hips, ankles) carries the `(0, 0)` sentinel; no angle
    /// math is attempted in that case.
    #[must_use]
    pub fn classify(&self, keypoints: &KeypointSet) -> PostureLabel {
        match self.features(keypoints) {
            Some(features) => self.decide(&features),
            None => PostureLabel::Unknown,
        }
    }

    /// Computes the geometric features for one keypoint set.
    ///
    /// Returns `None` when a critical keypoint is missing. Zero-norm
    /// denominators yield ratio 0 rather than NaN.
    #[must_use]
    pub fn features(&self, keypoints: &KeypointSet) -> Option<PoseFeatures> {
        if !keypoints.has_critical_keypoints() {
            return None;
        }

        let shoulder_mid = midpoint(
            keypoints.get(KeypointType::LeftShoulder).position(),
            keypoints.get(KeypointType::RightShoulder).position(),
        );
        let hip_mid = midpoint(
            keypoints.get(KeypointType::LeftHip).position(),
            keypoints.get(KeypointType::RightHip).position(),
        );
        let knee_mid = midpoint(
            keypoints.get(KeypointType::LeftKnee).position(),
            keypoints.get(KeypointType::RightKnee).position(),
        );
        let ankle_mid = midpoint(
            keypoints.get(KeypointType::LeftAnkle).position(),
            keypoints.get(KeypointType::RightAnkle).position(),
        );

        let torso = shoulder_mid.sub(&hip_mid);
        let thigh = knee_mid.sub(&hip_mid);
        let lower_leg = ankle_mid.sub(&knee_mid);

        let torso_angle_deg = angle_between_deg(torso, Vec2::UP);
        let knee_angle_deg = angle_between_deg(thigh, lower_leg);

        let total_height = euclidean_distance(shoulder_mid, ankle_mid);
        let hip_height = euclidean_distance(hip_mid, ankle_mid);
        let hip_height_ratio = if total_height < f32::EPSILON {
            0.0
        } else {
            hip_height / total_height
        };

        let shoulder_to_ankle = shoulder_mid.sub(&ankle_mid);
        let span = shoulder_to_ankle.norm();
        let horizontal_ratio = if span < f32::EPSILON {
            0.0
        } else {
            shoulder_to_ankle.x.abs() / span
        };

        let ankle_hip_dist = euclidean_distance(ankle_mid, hip_mid);

        Some(PoseFeatures {
            torso_angle_deg,
            knee_angle_deg,
            hip_height_ratio,
            horizontal_ratio,
            ankle_hip_dist,
            total_height,
        })
    }

    /// Maps computed features to a posture label.
    ///
    /// Priority order, first match wins; comparison strictness is part of
    /// the contract. A near-horizontal torso that misses the horizontal
    /// ratio or the ankle-hip gate falls through to the sitting checks —
    /// intentional layered disambiguation, not a bug.
    #[must_use]
    pub fn decide(&self, features: &PoseFeatures) -> PostureLabel {
        if features.torso_angle_deg >= self.config.fall_threshold_deg
            && features.horizontal_ratio > LYING_HORIZONTAL_RATIO
            && features.ankle_hip_dist < LYING_ANKLE_HIP_FACTOR * features.total_height
        {
            return PostureLabel::Lying;
        }

        if features.torso_angle_deg >= self.config.sit_threshold_deg {
            return if features.hip_height_ratio <= self.config.chair_height_ratio {
                PostureLabel::SittingChair
            } else {
                PostureLabel::SittingFloor
            };
        }

        if features.knee_angle_deg < SQUAT_KNEE_ANGLE_DEG {
            return PostureLabel::Squatting;
        }

        PostureLabel::Standing
    }
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}
