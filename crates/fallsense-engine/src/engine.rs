//! Engine facade tying the classifier and the tracker together.

use parking_lot::Mutex;
use tracing::info;

use fallsense_core::{KeypointSet, PersonId, PostureLabel, Timestamp};

use crate::classifier::{ClassifierConfig, PoseClassifier, PoseFeatures};
use crate::events::FallEvent;
use crate::tracking::{FallTracker, TrackerConfig};
use crate::{EngineError, EngineResult};

/// Combined engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Posture classifier thresholds
    pub classifier: ClassifierConfig,
    /// Fall confirmation and eviction timing
    pub tracker: TrackerConfig,
}

impl EngineConfig {
    /// Starts building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Checks the configuration for nonsensical values.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when an angle threshold leaves
    /// `(0, 180)`, a ratio leaves `(0, 1]`, or a duration is not a
    /// positive finite number.
    pub fn validate(&self) -> EngineResult<()> {
        let angle = |name: &str, value: f32| -> EngineResult<()> {
            if !value.is_finite() || value <= 0.0 || value >= 180.0 {
                return Err(EngineError::config(format!(
                    "{name} must be an angle in (0, 180), got {value}"
                )));
            }
            Ok(())
        };
        angle("fall_threshold_deg", self.classifier.fall_threshold_deg)?;
        angle("sit_threshold_deg", self.classifier.sit_threshold_deg)?;

        let ratio = self.classifier.chair_height_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(EngineError::config(format!(
                "chair_height_ratio must be in (0, 1], got {ratio}"
            )));
        }

        let duration = |name: &str, value: f64| -> EngineResult<()> {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::config(format!(
                    "{name} must be a positive number of seconds, got {value}"
                )));
            }
            Ok(())
        };
        duration("fall_duration_secs", self.tracker.fall_duration_secs)?;
        duration("idle_eviction_secs", self.tracker.idle_eviction_secs)?;
        duration("sweep_interval_secs", self.tracker.sweep_interval_secs)?;

        Ok(())
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Torso angle from vertical at which lying becomes possible (degrees).
    #[must_use]
    pub fn fall_threshold_deg(mut self, degrees: f32) -> Self {
        self.config.classifier.fall_threshold_deg = degrees;
        self
    }

    /// Torso angle from vertical at which sitting becomes possible (degrees).
    #[must_use]
    pub fn sit_threshold_deg(mut self, degrees: f32) -> Self {
        self.config.classifier.sit_threshold_deg = degrees;
        self
    }

    /// Hip-height ratio separating chair sitting from floor sitting.
    #[must_use]
    pub fn chair_height_ratio(mut self, ratio: f32) -> Self {
        self.config.classifier.chair_height_ratio = ratio;
        self
    }

    /// Continuous lying time required before a fall is confirmed (seconds).
    #[must_use]
    pub fn fall_duration_secs(mut self, seconds: f64) -> Self {
        self.config.tracker.fall_duration_secs = seconds;
        self
    }

    /// Idle time after which an unseen person's track is evicted (seconds).
    #[must_use]
    pub fn idle_eviction_secs(mut self, seconds: f64) -> Self {
        self.config.tracker.idle_eviction_secs = seconds;
        self
    }

    /// Minimum spacing between lazy eviction sweeps (seconds).
    #[must_use]
    pub fn sweep_interval_secs(mut self, seconds: f64) -> Self {
        self.config.tracker.sweep_interval_secs = seconds;
        self
    }

    /// Validates and produces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for out-of-range values, see
    /// [`EngineConfig::validate`].
    pub fn build(self) -> EngineResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The engine's verdict for one person in one frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameAssessment {
    /// Person the assessment concerns
    pub person_id: PersonId,
    /// Stream timestamp of the assessed frame
    pub timestamp: Timestamp,
    /// Frame-level posture label
    pub posture: PostureLabel,
    /// Raw geometry behind the label, absent when keypoints were missing
    pub features: Option<PoseFeatures>,
    /// The person's lying episode has reached the fall duration
    pub fall_confirmed: bool,
    /// Set exactly once per episode, on the confirming frame
    pub event: Option<FallEvent>,
}

/// Fall detection engine for one video stream.
///
/// Classification is stateless, so the engine only locks around the
/// tracker state; it is safe to share behind an `Arc` across threads
/// feeding the same stream.
#[derive(Debug)]
pub struct FallEngine {
    classifier: PoseClassifier,
    tracker: Mutex<FallTracker>,
    config: EngineConfig,
}

impl FallEngine {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the configuration fails
    /// [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: PoseClassifier::new(config.classifier),
            tracker: Mutex::new(FallTracker::new(config.tracker)),
            config,
        })
    }

    /// Creates an engine with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            classifier: PoseClassifier::with_defaults(),
            tracker: Mutex::new(FallTracker::with_defaults()),
            config: EngineConfig::default(),
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes raw `(x, y)` keypoint pairs for one person.
    ///
    /// Validates the pairs first; a malformed frame is rejected without
    /// touching the person's tracking state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Input`] when the pairs are not exactly 17
    /// finite coordinates.
    pub fn process(
        &self,
        person: PersonId,
        pairs: &[(f32, f32)],
        now: Timestamp,
    ) -> EngineResult<FrameAssessment> {
        let keypoints = KeypointSet::from_pairs(pairs)?;
        Ok(self.process_set(person, &keypoints, now))
    }

    /// Processes an already validated keypoint set for one person.
    pub fn process_set(
        &self,
        person: PersonId,
        keypoints: &KeypointSet,
        now: Timestamp,
    ) -> FrameAssessment {
        let features = self.classifier.features(keypoints);
        let posture = match features {
            Some(ref f) => self.classifier.decide(f),
            None => PostureLabel::Unknown,
        };

        let (outcome, elapsed) = {
            let mut tracker = self.tracker.lock();
            let outcome = tracker.update(person, posture, now);
            (outcome, tracker.lying_elapsed(person, now))
        };

        let event = if outcome.newly_confirmed {
            let lying_duration = elapsed.unwrap_or(self.config.tracker.fall_duration_secs);
            info!(
                person = %person,
                at = now.as_secs_f64(),
                lying_duration,
                "fall confirmed"
            );
            Some(FallEvent::new(person, now, lying_duration))
        } else {
            None
        };

        FrameAssessment {
            person_id: person,
            timestamp: now,
            posture,
            features,
            fall_confirmed: outcome.confirmed,
            event,
        }
    }

    /// Processes every detected person of one frame.
    pub fn process_frame(
        &self,
        detections: &[(PersonId, KeypointSet)],
        now: Timestamp,
    ) -> Vec<FrameAssessment> {
        detections
            .iter()
            .map(|(person, keypoints)| self.process_set(*person, keypoints, now))
            .collect()
    }

    /// Signals that a person left the scene, dropping their track.
    ///
    /// Returns `true` if a track existed.
    pub fn person_departed(&self, person: PersonId) -> bool {
        self.tracker.lock().person_departed(person)
    }

    /// Number of persons currently tracked.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracker.lock().track_count()
    }
}
