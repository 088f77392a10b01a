//! Confirmed-fall event records.
//!
//! Emitted exactly once per confirmed lying episode; consumers dispatch
//! them to alerting channels, storage, or dashboards.

use chrono::{DateTime, Utc};
use fallsense_core::{PersonId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fall event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallEventId(Uuid);

impl FallEventId {
    /// Generates a fresh event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FallEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FallEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed fall for one tracked person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallEvent {
    /// Unique event identifier
    pub id: FallEventId,
    /// Person the event concerns
    pub person_id: PersonId,
    /// Stream timestamp of the confirming frame
    pub confirmed_at: Timestamp,
    /// How long the person had been lying when confirmation fired (seconds)
    pub lying_duration_secs: f64,
    /// Wall-clock time the event record was created
    pub detected_at: DateTime<Utc>,
}

impl FallEvent {
    /// Creates a fall event stamped with the current wall-clock time.
    #[must_use]
    pub fn new(person_id: PersonId, confirmed_at: Timestamp, lying_duration_secs: f64) -> Self {
        Self {
            id: FallEventId::new(),
            person_id,
            confirmed_at,
            lying_duration_secs,
            detected_at: Utc::now(),
        }
    }
}
