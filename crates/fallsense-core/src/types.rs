//! Core data types for the FallSense system.
//!
//! This module defines the data structures shared by the pose classifier
//! and the fall tracker:
//!
//! - **Keypoint Types**: [`KeypointType`], [`Keypoint`], [`KeypointSet`]
//!   for the COCO-17 skeleton produced by the upstream pose model
//! - **Posture Types**: [`PostureLabel`], the closed set of frame-level
//!   posture classifications
//! - **Common Types**: [`PersonId`], [`Timestamp`]

use crate::error::{CoreError, CoreResult};
use crate::geometry::Vec2;
use crate::NUM_KEYPOINTS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Common Types
// =============================================================================

/// Identifier for a tracked person, assigned by the upstream tracker.
///
/// Stable and unique within one video stream; identity fusion across
/// cameras is an upstream concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PersonId(u64);

impl PersonId {
    /// Creates a person ID from the upstream tracker's numeric identity.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PersonId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stream-local frame timestamp.
///
/// Seconds are monotonic within one video stream; the zero point is the
/// stream's own origin, not the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    /// Whole seconds since the stream origin
    pub seconds: i64,
    /// Nanoseconds within the second
    pub nanos: u32,
}

impl Timestamp {
    const NANOS_PER_SEC: u32 = 1_000_000_000;

    /// Creates a new timestamp from seconds and nanoseconds.
    #[must_use]
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a timestamp from fractional seconds.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        let whole = secs.floor();
        let mut seconds = whole as i64;
        let mut nanos = ((secs - whole) * f64::from(Self::NANOS_PER_SEC)).round() as u32;
        if nanos >= Self::NANOS_PER_SEC {
            seconds += 1;
            nanos -= Self::NANOS_PER_SEC;
        }
        Self { seconds, nanos }
    }

    /// Returns the timestamp as fractional seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + f64::from(self.nanos) / f64::from(Self::NANOS_PER_SEC)
    }

    /// Returns the timestamp as total nanoseconds since the stream origin.
    #[must_use]
    pub fn as_nanos(&self) -> i128 {
        i128::from(self.seconds) * 1_000_000_000 + i128::from(self.nanos)
    }

    /// Returns the duration between two timestamps in seconds.
    #[must_use]
    pub fn duration_since(&self, earlier: &Self) -> f64 {
        let diff_nanos = self.as_nanos() - earlier.as_nanos();
        diff_nanos as f64 / 1_000_000_000.0
    }
}

// =============================================================================
// Keypoint Types
// =============================================================================

/// Types of body keypoints following COCO format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum KeypointType {
    /// Nose
    Nose = 0,
    /// Left eye
    LeftEye = 1,
    /// Right eye
    RightEye = 2,
    /// Left ear
    LeftEar = 3,
    /// Right ear
    RightEar = 4,
    /// Left shoulder
    LeftShoulder = 5,
    /// Right shoulder
    RightShoulder = 6,
    /// Left elbow
    LeftElbow = 7,
    /// Right elbow
    RightElbow = 8,
    /// Left wrist
    LeftWrist = 9,
    /// Right wrist
    RightWrist = 10,
    /// Left hip
    LeftHip = 11,
    /// Right hip
    RightHip = 12,
    /// Left knee
    LeftKnee = 13,
    /// Right knee
    RightKnee = 14,
    /// Left ankle
    LeftAnkle = 15,
    /// Right ankle
    RightAnkle = 16,
}

impl KeypointType {
    /// Keypoints the classifier cannot do without: shoulders, hips, ankles.
    pub const CRITICAL: [Self; 6] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Returns all keypoint types in anatomical order.
    #[must_use]
    pub fn all() -> &'static [Self; NUM_KEYPOINTS] {
        &[
            Self::Nose,
            Self::LeftEye,
            Self::RightEye,
            Self::LeftEar,
            Self::RightEar,
            Self::LeftShoulder,
            Self::RightShoulder,
            Self::LeftElbow,
            Self::RightElbow,
            Self::LeftWrist,
            Self::RightWrist,
            Self::LeftHip,
            Self::RightHip,
            Self::LeftKnee,
            Self::RightKnee,
            Self::LeftAnkle,
            Self::RightAnkle,
        ]
    }

    /// Returns the keypoint name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Returns `true` if this keypoint is required for posture classification.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        Self::CRITICAL.contains(self)
    }
}

impl TryFrom<u8> for KeypointType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Nose),
            1 => Ok(Self::LeftEye),
            2 => Ok(Self::RightEye),
            3 => Ok(Self::LeftEar),
            4 => Ok(Self::RightEar),
            5 => Ok(Self::LeftShoulder),
            6 => Ok(Self::RightShoulder),
            7 => Ok(Self::LeftElbow),
            8 => Ok(Self::RightElbow),
            9 => Ok(Self::LeftWrist),
            10 => Ok(Self::RightWrist),
            11 => Ok(Self::LeftHip),
            12 => Ok(Self::RightHip),
            13 => Ok(Self::LeftKnee),
            14 => Ok(Self::RightKnee),
            15 => Ok(Self::LeftAnkle),
            16 => Ok(Self::RightAnkle),
            _ => Err(CoreError::validation(format!(
                "Invalid keypoint type: {value}"
            ))),
        }
    }
}

/// A single body keypoint in image pixel space, y increasing downward.
///
/// The upstream model reports an undetected landmark as exactly `(0, 0)`;
/// that pair is a sentinel, not a real location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    /// Type of keypoint
    pub keypoint_type: KeypointType,
    /// X coordinate (pixels)
    pub x: f32,
    /// Y coordinate (pixels)
    pub y: f32,
}

impl Keypoint {
    /// Creates a new keypoint.
    #[must_use]
    pub const fn new(keypoint_type: KeypointType, x: f32, y: f32) -> Self {
        Self { keypoint_type, x, y }
    }

    /// Returns `true` if this keypoint is the "not detected" sentinel.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns the position as a geometry vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// One frame's keypoints for one person: exactly 17 points in COCO order.
///
/// Immutable once constructed. Construction validates shape and
/// finiteness, so downstream geometry never sees malformed input; missing
/// keypoints (the `(0, 0)` sentinel) remain a legal, expected condition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeypointSet {
    points: [Keypoint; NUM_KEYPOINTS],
}

impl KeypointSet {
    /// Builds a keypoint set from `(x, y)` pairs in COCO order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKeypointCount`] unless exactly 17 pairs
    /// are supplied, and [`CoreError::NonFiniteCoordinate`] when any
    /// coordinate is NaN or infinite.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> CoreResult<Self> {
        if pairs.len() != NUM_KEYPOINTS {
            return Err(CoreError::InvalidKeypointCount {
                expected: NUM_KEYPOINTS,
                actual: pairs.len(),
            });
        }

        let mut points = [Keypoint::new(KeypointType::Nose, 0.0, 0.0); NUM_KEYPOINTS];
        for (kind, &(x, y)) in KeypointType::all().iter().zip(pairs) {
            if !x.is_finite() || !y.is_finite() {
                return Err(CoreError::NonFiniteCoordinate {
                    keypoint: kind.name(),
                    x,
                    y,
                });
            }
            points[*kind as usize] = Keypoint::new(*kind, x, y);
        }

        Ok(Self { points })
    }

    /// Builds a keypoint set from individual keypoints, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidKeypointCount`] unless exactly 17
    /// keypoints are supplied, [`CoreError::NonFiniteCoordinate`] for NaN
    /// or infinite coordinates, and [`CoreError::Validation`] when a
    /// landmark appears twice.
    pub fn from_points(points: Vec<Keypoint>) -> CoreResult<Self> {
        if points.len() != NUM_KEYPOINTS {
            return Err(CoreError::InvalidKeypointCount {
                expected: NUM_KEYPOINTS,
                actual: points.len(),
            });
        }

        let mut slots = [None; NUM_KEYPOINTS];
        for point in points {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(CoreError::NonFiniteCoordinate {
                    keypoint: point.keypoint_type.name(),
                    x: point.x,
                    y: point.y,
                });
            }
            let slot = &mut slots[point.keypoint_type as usize];
            if slot.is_some() {
                return Err(CoreError::validation(format!(
                    "Duplicate keypoint: {}",
                    point.keypoint_type.name()
                )));
            }
            *slot = Some(point);
        }

        // Length and uniqueness together guarantee every slot is filled.
        let mut result = [Keypoint::new(KeypointType::Nose, 0.0, 0.0); NUM_KEYPOINTS];
        for (slot, out) in slots.iter().zip(result.iter_mut()) {
            match slot {
                Some(point) => *out = *point,
                None => {
                    return Err(CoreError::validation(
                        "Incomplete keypoint set".to_string(),
                    ))
                }
            }
        }

        Ok(Self { points: result })
    }

    /// Returns the keypoint for the given landmark.
    #[must_use]
    pub fn get(&self, kind: KeypointType) -> Keypoint {
        self.points[kind as usize]
    }

    /// Returns `true` if the given landmark was not detected.
    #[must_use]
    pub fn is_missing(&self, kind: KeypointType) -> bool {
        self.get(kind).is_missing()
    }

    /// Returns `true` if every classifier-critical keypoint was detected.
    #[must_use]
    pub fn has_critical_keypoints(&self) -> bool {
        KeypointType::CRITICAL.iter().all(|k| !self.is_missing(*k))
    }

    /// Iterates over all keypoints in COCO order.
    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.points.iter()
    }
}

// =============================================================================
// Posture Types
// =============================================================================

/// Frame-level posture classification for one tracked person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PostureLabel {
    /// Critical keypoints were missing; must never trigger fall logic
    Unknown,
    /// Body near-horizontal, ankles close to hips
    Lying,
    /// Torso tilted, hips elevated relative to total height
    SittingChair,
    /// Torso tilted, hips low relative to total height
    SittingFloor,
    /// Knees sharply bent
    Squatting,
    /// None of the above
    Standing,
}

impl PostureLabel {
    /// Returns the label name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Lying => "LYING",
            Self::SittingChair => "SITTING_CHAIR",
            Self::SittingFloor => "SITTING_FLOOR",
            Self::Squatting => "SQUATTING",
            Self::Standing => "STANDING",
        }
    }

    /// Returns `true` if this label arms or sustains a lying episode.
    #[must_use]
    pub fn is_lying(&self) -> bool {
        matches!(self, Self::Lying)
    }
}

impl std::fmt::Display for PostureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
