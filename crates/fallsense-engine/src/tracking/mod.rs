//! Temporal fall confirmation for tracked persons.
//!
//! The classifier labels single frames; this module debounces those labels
//! over time. A person must hold LYING continuously for a configured
//! duration before a fall is confirmed, and per-person state is bounded:
//! tracks disappear on an explicit departure signal or after an idle
//! horizon, whichever comes first.

mod tracker;

pub use tracker::FallTracker;

use serde::{Deserialize, Serialize};

/// Configuration for the fall tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Continuous lying time required before a fall is confirmed (seconds)
    pub fall_duration_secs: f64,
    /// Idle time after which an unseen person's track is evicted (seconds)
    pub idle_eviction_secs: f64,
    /// Minimum spacing between lazy eviction sweeps (seconds)
    pub sweep_interval_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            fall_duration_secs: 2.0,
            idle_eviction_secs: 60.0,
            sweep_interval_secs: 10.0,
        }
    }
}

/// Result of feeding one labeled frame for one person into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOutcome {
    /// The lying episode has lasted at least the configured fall duration
    pub confirmed: bool,
    /// This frame is the first confirmed frame of the episode
    pub newly_confirmed: bool,
}

impl TrackOutcome {
    pub(crate) const CLEAR: Self = Self {
        confirmed: false,
        newly_confirmed: false,
    };
}
