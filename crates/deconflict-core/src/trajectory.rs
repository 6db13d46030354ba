//! Time-parameterized flight path built from sparse waypoints.
//!
//! Each segment is flown at a constant speed, so a waypoint's arrival time is the
//! cumulative segment length divided by speed. Position is defined only on
//! `[0, duration]`; queries outside that domain fail with
//! [`DeconflictionError::OutOfRange`] rather than clamping.

use crate::error::{DeconflictionError, DeconflictionResult};
use crate::models::Waypoint;

/// Continuous position function of elapsed time. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
    /// Arrival time at each waypoint, starting at 0
    arrival_times: Vec<f64>,
    length: f64,
}

impl Trajectory {
    /// Build a trajectory flown at one constant speed.
    pub fn new(waypoints: Vec<Waypoint>, speed: f64) -> DeconflictionResult<Self> {
        let segments = waypoints.len().saturating_sub(1);
        Self::with_segment_speeds(waypoints, &vec![speed; segments.max(1)])
    }

    /// Build a trajectory with one speed per segment (`waypoints.len() - 1` values).
    pub fn with_segment_speeds(
        waypoints: Vec<Waypoint>,
        speeds: &[f64],
    ) -> DeconflictionResult<Self> {
        if waypoints.len() < 2 {
            return Err(DeconflictionError::InvalidTrajectory(format!(
                "at least 2 waypoints required, got {}",
                waypoints.len()
            )));
        }
        if speeds.len() != waypoints.len() - 1 {
            return Err(DeconflictionError::InvalidTrajectory(format!(
                "expected {} segment speeds, got {}",
                waypoints.len() - 1,
                speeds.len()
            )));
        }
        if let Some(index) = waypoints.iter().position(|wp| !wp.is_finite()) {
            return Err(DeconflictionError::InvalidTrajectory(format!(
                "waypoint {index} has a non-finite coordinate"
            )));
        }

        let mut arrival_times = Vec::with_capacity(waypoints.len());
        arrival_times.push(0.0);
        let mut elapsed = 0.0;
        let mut length = 0.0;

        for (index, (segment, &speed)) in waypoints.windows(2).zip(speeds).enumerate() {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(DeconflictionError::InvalidTrajectory(format!(
                    "segment {index} speed must be positive, got {speed}"
                )));
            }
            let distance = segment[0].distance_to(&segment[1]);
            // Coincident waypoints leave the segment with no duration to interpolate over.
            if distance <= 0.0 {
                return Err(DeconflictionError::InvalidTrajectory(format!(
                    "waypoints {index} and {} coincide",
                    index + 1
                )));
            }
            // Extreme speeds can round the segment time to 0 or overflow it.
            let segment_time = distance / speed;
            if !(segment_time > 0.0 && segment_time.is_finite()) {
                return Err(DeconflictionError::InvalidTrajectory(format!(
                    "segment {index} time {segment_time} is not a positive finite value"
                )));
            }
            let previous = elapsed;
            elapsed += segment_time;
            if !(elapsed > previous && elapsed.is_finite()) {
                return Err(DeconflictionError::InvalidTrajectory(format!(
                    "arrival time at waypoint {} does not advance past {previous}",
                    index + 1
                )));
            }
            length += distance;
            arrival_times.push(elapsed);
        }

        Ok(Self {
            waypoints,
            arrival_times,
            length,
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    /// Total flight time from first to last waypoint.
    pub fn duration(&self) -> f64 {
        self.arrival_times[self.arrival_times.len() - 1]
    }

    /// Total path length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Position at elapsed time `t`, linearly interpolated within its segment.
    pub fn position(&self, t: f64) -> DeconflictionResult<Waypoint> {
        let duration = self.duration();
        // Written so NaN also lands in the error branch.
        if !(t >= 0.0 && t <= duration) {
            return Err(DeconflictionError::OutOfRange { t, duration });
        }
        Ok(self.interpolate(t))
    }

    /// Position at `t` after clamping into `[0, duration]`.
    ///
    /// Used by the engine for sample instants that are inside the occupancy window
    /// but drift past the domain by floating-point error after the start-time offset.
    pub(crate) fn position_clamped(&self, t: f64) -> Waypoint {
        self.interpolate(t.clamp(0.0, self.duration()))
    }

    fn interpolate(&self, t: f64) -> Waypoint {
        let segment = self.segment_index(t);
        let t0 = self.arrival_times[segment];
        let t1 = self.arrival_times[segment + 1];
        let fraction = (t - t0) / (t1 - t0);
        self.waypoints[segment].lerp(&self.waypoints[segment + 1], fraction)
    }

    /// Index of the last segment whose start time is `<= t`; the final waypoint maps
    /// to the last segment.
    fn segment_index(&self, t: f64) -> usize {
        let starts_at_or_before = self.arrival_times.partition_point(|&time| time <= t);
        starts_at_or_before
            .saturating_sub(1)
            .min(self.waypoints.len() - 2)
    }
}
