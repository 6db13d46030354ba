//! Core data models for strategic deconfliction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DeconflictionResult;
use crate::spatial::TimeWindow;
use crate::trajectory::Trajectory;

/// A point in local Cartesian airspace coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        crate::spatial::euclidean_distance(self, other)
    }

    /// Linear interpolation toward `other`; `fraction` 0 yields `self`, 1 yields `other`.
    pub fn lerp(&self, other: &Waypoint, fraction: f64) -> Waypoint {
        if fraction <= 0.0 {
            return *self;
        }
        if fraction >= 1.0 {
            return *other;
        }
        Waypoint {
            x: self.x + fraction * (other.x - self.x),
            y: self.y + fraction * (other.y - self.y),
            z: self.z + fraction * (other.z - self.z),
        }
    }
}

impl From<[f64; 3]> for Waypoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Waypoint {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A trajectory anchored to an absolute start time.
///
/// Time is a single linear axis in seconds. Replacing a scheduled flight means
/// unregistering it and registering a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    id: String,
    trajectory: Trajectory,
    start_time: f64,
}

impl Flight {
    pub fn new(id: impl Into<String>, trajectory: Trajectory, start_time: f64) -> Self {
        Self {
            id: id.into(),
            trajectory,
            start_time,
        }
    }

    /// Anchor a trajectory at a calendar timestamp (seconds since the Unix epoch).
    pub fn departing_at(
        id: impl Into<String>,
        trajectory: Trajectory,
        departure_time: DateTime<Utc>,
    ) -> Self {
        Self::new(id, trajectory, epoch_seconds(departure_time))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.trajectory.duration()
    }

    /// Absolute occupancy window `[start_time, start_time + duration]`.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time())
    }

    /// Position at an absolute time. Fails outside the occupancy window.
    pub fn position_at(&self, t: f64) -> DeconflictionResult<Waypoint> {
        self.trajectory.position(t - self.start_time)
    }
}

/// Convert a calendar timestamp to the linear time axis used by the engine.
pub fn epoch_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

/// Evidence of one separation violation against a scheduled flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Scheduled flight the candidate came too close to
    pub flight_id: String,
    /// Absolute time of the first violating sample
    pub time: f64,
    /// Candidate position at that instant
    pub location: Waypoint,
    /// Distance between the two drones at that instant
    pub separation: f64,
}

/// Outcome of validating a candidate flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "conflicts", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// No scheduled flight comes within the safety buffer
    Clear,
    /// At most one record per conflicting flight, in flight-id order
    Conflict(Vec<ConflictRecord>),
}

impl ValidationResult {
    /// Classify an ordered list of records.
    pub fn from_records(records: Vec<ConflictRecord>) -> Self {
        if records.is_empty() {
            ValidationResult::Clear
        } else {
            ValidationResult::Conflict(records)
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, ValidationResult::Clear)
    }

    pub fn conflicts(&self) -> &[ConflictRecord] {
        match self {
            ValidationResult::Clear => &[],
            ValidationResult::Conflict(records) => records,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ValidationResult::Clear => "CLEAR",
            ValidationResult::Conflict(_) => "CONFLICT",
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}
