//! Per-person lying-episode state machine with bounded memory.

use std::collections::HashMap;

use fallsense_core::{PersonId, PostureLabel, Timestamp};
use tracing::debug;

use super::{TrackOutcome, TrackerConfig};

/// Tracking state for one person.
#[derive(Debug, Clone, Copy)]
struct PersonTrack {
    /// Start of the current uninterrupted lying episode, if any
    lying_since: Option<Timestamp>,
    /// Timestamp of the most recent frame mentioning this person
    last_seen: Timestamp,
    /// The current episode has already produced its confirmation edge
    alerted: bool,
}

impl PersonTrack {
    fn new(now: Timestamp) -> Self {
        Self {
            lying_since: None,
            last_seen: now,
            alerted: false,
        }
    }
}

/// Debounces per-frame posture labels into confirmed falls.
///
/// One tracker serves one video stream; frame timestamps are expected to
/// be non-decreasing. Memory stays bounded by the number of persons seen
/// within the idle horizon: tracks are dropped on [`person_departed`] and
/// swept lazily during [`update`] calls.
///
/// [`person_departed`]: FallTracker::person_departed
/// [`update`]: FallTracker::update
#[derive(Debug)]
pub struct FallTracker {
    config: TrackerConfig,
    tracks: HashMap<PersonId, PersonTrack>,
    last_sweep: Option<Timestamp>,
}

impl FallTracker {
    /// Creates a tracker with the provided configuration.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: HashMap::new(),
            last_sweep: None,
        }
    }

    /// Creates a tracker with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(TrackerConfig::default())
    }

    /// Returns the tracker configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Feeds one labeled frame for one person.
    ///
    /// Returns `true` when the person's current lying episode has lasted
    /// at least the configured fall duration. Equivalent to
    /// [`update`](Self::update) without the edge information.
    pub fn observe(&mut self, person: PersonId, label: PostureLabel, now: Timestamp) -> bool {
        self.update(person, label, now).confirmed
    }

    /// Feeds one labeled frame for one person, reporting the edge.
    ///
    /// Any non-lying label, including UNKNOWN, ends the episode: the next
    /// lying frame starts timing from zero. Once confirmed, every further
    /// lying frame of the same episode reports `confirmed` again, but
    /// `newly_confirmed` fires exactly once per episode.
    pub fn update(&mut self, person: PersonId, label: PostureLabel, now: Timestamp) -> TrackOutcome {
        self.maybe_sweep(now);

        let track = self
            .tracks
            .entry(person)
            .or_insert_with(|| PersonTrack::new(now));
        track.last_seen = now;

        if !label.is_lying() {
            if track.lying_since.is_some() {
                debug!(person = %person, label = %label, "lying episode ended");
            }
            track.lying_since = None;
            track.alerted = false;
            return TrackOutcome::CLEAR;
        }

        let since = match track.lying_since {
            Some(since) => since,
            None => {
                debug!(person = %person, at = now.as_secs_f64(), "lying episode started");
                track.lying_since = Some(now);
                now
            }
        };

        let confirmed = now.duration_since(&since) >= self.config.fall_duration_secs;
        let newly_confirmed = confirmed && !track.alerted;
        if newly_confirmed {
            track.alerted = true;
        }

        TrackOutcome {
            confirmed,
            newly_confirmed,
        }
    }

    /// Drops a person's track on an explicit departure signal.
    ///
    /// Returns `true` if a track existed. A person who reappears later is
    /// tracked from scratch.
    pub fn person_departed(&mut self, person: PersonId) -> bool {
        let removed = self.tracks.remove(&person).is_some();
        if removed {
            debug!(person = %person, "track removed on departure");
        }
        removed
    }

    /// Evicts every track not seen within the idle horizon.
    ///
    /// Runs automatically from [`update`](Self::update) at the configured
    /// sweep interval; exposed for callers that want an eager sweep.
    pub fn sweep_idle(&mut self, now: Timestamp) {
        let horizon = self.config.idle_eviction_secs;
        let before = self.tracks.len();
        self.tracks
            .retain(|_, track| now.duration_since(&track.last_seen) < horizon);
        let evicted = before - self.tracks.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.tracks.len(), "idle tracks evicted");
        }
    }

    /// Number of persons currently tracked.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` if the person is in an unconfirmed lying episode.
    #[must_use]
    pub fn is_lying_pending(&self, person: PersonId) -> bool {
        self.tracks
            .get(&person)
            .is_some_and(|t| t.lying_since.is_some() && !t.alerted)
    }

    /// Seconds the person has been lying so far, if in an episode.
    #[must_use]
    pub fn lying_elapsed(&self, person: PersonId, now: Timestamp) -> Option<f64> {
        self.tracks
            .get(&person)
            .and_then(|t| t.lying_since)
            .map(|since| now.duration_since(&since))
    }

    fn maybe_sweep(&mut self, now: Timestamp) {
        let due = match self.last_sweep {
            Some(last) => now.duration_since(&last) >= self.config.sweep_interval_secs,
            None => true,
        };
        if due {
            self.sweep_idle(now);
            self.last_sweep = Some(now);
        }
    }
}

impl Default for FallTracker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    #[test]
    fn test_fall_confirmed_after_continuous_lying() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(7);

        // Lying frames every 0.5 s: confirmation lands exactly at the
        // two-second mark, inclusive.
        for (at, expected) in [
            (0.0, false),
            (0.5, false),
            (1.0, false),
            (1.5, false),
            (2.0, true),
        ] {
            assert_eq!(
                tracker.observe(person, PostureLabel::Lying, ts(at)),
                expected,
                "at t={at}"
            );
        }
    }

    #[test]
    fn test_interruption_restarts_the_clock() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(1);

        assert!(!tracker.observe(person, PostureLabel::Lying, ts(0.0)));
        assert!(!tracker.observe(person, PostureLabel::Lying, ts(1.5)));
        assert!(!tracker.observe(person, PostureLabel::Standing, ts(1.8)));

        // The earlier 1.5 s of lying no longer counts.
        assert!(!tracker.observe(person, PostureLabel::Lying, ts(2.0)));
        assert!(!tracker.observe(person, PostureLabel::Lying, ts(3.9)));
        assert!(tracker.observe(person, PostureLabel::Lying, ts(4.0)));
    }

    #[test]
    fn test_unknown_clears_like_any_non_lying_label() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(2);

        assert!(!tracker.observe(person, PostureLabel::Lying, ts(0.0)));
        assert!(!tracker.observe(person, PostureLabel::Unknown, ts(1.0)));
        assert!(!tracker.observe(person, PostureLabel::Lying, ts(2.5)));
        assert!(tracker.is_lying_pending(person));
        assert!(tracker.observe(person, PostureLabel::Lying, ts(4.5)));
    }

    #[test]
    fn test_confirmation_edge_fires_once_per_episode() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(3);

        tracker.update(person, PostureLabel::Lying, ts(0.0));
        let first = tracker.update(person, PostureLabel::Lying, ts(2.0));
        assert!(first.confirmed && first.newly_confirmed);

        let repeat = tracker.update(person, PostureLabel::Lying, ts(3.0));
        assert!(repeat.confirmed && !repeat.newly_confirmed);

        // Recovery then a second fall produces a fresh edge.
        tracker.update(person, PostureLabel::Standing, ts(4.0));
        tracker.update(person, PostureLabel::Lying, ts(5.0));
        let second = tracker.update(person, PostureLabel::Lying, ts(7.5));
        assert!(second.confirmed && second.newly_confirmed);
    }

    #[test]
    fn test_persons_are_independent() {
        let mut tracker = FallTracker::with_defaults();
        let a = PersonId::new(10);
        let b = PersonId::new(11);

        tracker.observe(a, PostureLabel::Lying, ts(0.0));
        tracker.observe(b, PostureLabel::Standing, ts(0.0));

        assert!(tracker.observe(a, PostureLabel::Lying, ts(2.5)));
        assert!(!tracker.observe(b, PostureLabel::Lying, ts(2.5)));
        assert_eq!(tracker.track_count(), 2);
    }

    #[test]
    fn test_departure_removes_track() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(4);

        tracker.observe(person, PostureLabel::Lying, ts(0.0));
        assert_eq!(tracker.track_count(), 1);
        assert!(tracker.person_departed(person));
        assert_eq!(tracker.track_count(), 0);
        assert!(!tracker.person_departed(person));

        // Reappearance starts a new episode from scratch.
        assert!(!tracker.observe(person, PostureLabel::Lying, ts(3.0)));
        assert!((tracker.lying_elapsed(person, ts(3.5)).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_idle_tracks_are_swept() {
        let config = TrackerConfig {
            fall_duration_secs: 2.0,
            idle_eviction_secs: 60.0,
            sweep_interval_secs: 10.0,
        };
        let mut tracker = FallTracker::new(config);
        let idle = PersonId::new(20);
        let active = PersonId::new(21);

        tracker.observe(idle, PostureLabel::Lying, ts(0.0));
        tracker.observe(active, PostureLabel::Standing, ts(0.0));
        assert_eq!(tracker.track_count(), 2);

        // Keep the active person fresh; the idle one crosses the horizon.
        for at in [15.0, 30.0, 45.0, 61.0] {
            tracker.observe(active, PostureLabel::Standing, ts(at));
        }
        assert_eq!(tracker.track_count(), 1);
        assert!(tracker.lying_elapsed(idle, ts(61.0)).is_none());
    }

    #[test]
    fn test_sweep_respects_interval() {
        let mut tracker = FallTracker::with_defaults();
        let idle = PersonId::new(30);
        let active = PersonId::new(31);

        tracker.observe(idle, PostureLabel::Standing, ts(0.0));
        // A sweep runs at t=55 while the idle track is still inside the
        // horizon. At t=62 the track is past the horizon, but the next
        // sweep is not due yet.
        tracker.observe(active, PostureLabel::Standing, ts(55.0));
        tracker.observe(active, PostureLabel::Standing, ts(62.0));
        assert_eq!(tracker.track_count(), 2);

        // First frame past the sweep interval evicts it.
        tracker.observe(active, PostureLabel::Standing, ts(66.0));
        assert_eq!(tracker.track_count(), 1);
    }

    #[test]
    fn test_eager_sweep() {
        let mut tracker = FallTracker::with_defaults();
        let person = PersonId::new(40);

        tracker.observe(person, PostureLabel::Lying, ts(0.0));
        tracker.sweep_idle(ts(120.0));
        assert_eq!(tracker.track_count(), 0);
    }
}
