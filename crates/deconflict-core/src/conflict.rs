//! Strategic conflict detection against scheduled flights.
//!
//! A candidate trajectory is checked against every registered flight whose
//! occupancy window overlaps its own. Within the overlap both positions are
//! sampled at a fixed resolution and the first sample closer than the safety
//! buffer is reported. Conflicts narrower than one sample step can be missed;
//! lower the resolution for tighter guarantees.

use rayon::prelude::*;
use std::iter;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{DeconflictionError, DeconflictionResult};
use crate::models::{ConflictRecord, Flight, ValidationResult};
use crate::registry::FlightRegistry;
use crate::rules::ValidationConfig;
use crate::spatial::{euclidean_distance, TimeWindow};
use crate::trajectory::Trajectory;

/// Owns the scheduled-flight registry and validates candidate flights against it.
///
/// All methods take `&self`; the engine can be shared across threads.
#[derive(Debug, Default)]
pub struct DeconflictionEngine {
    registry: FlightRegistry,
}

impl DeconflictionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a flight.
    pub fn register(&self, flight: Flight) -> DeconflictionResult<()> {
        if !flight.start_time().is_finite() {
            return Err(DeconflictionError::InvalidConfiguration(format!(
                "flight '{}' start time must be finite",
                flight.id()
            )));
        }
        let window = flight.window();
        let flight_id = flight.id().to_string();
        self.registry.insert(flight)?;
        debug!(
            flight_id = %flight_id,
            start = window.start,
            end = window.end,
            "Registered scheduled flight"
        );
        Ok(())
    }

    /// Remove a scheduled flight, returning it.
    pub fn unregister(&self, flight_id: &str) -> DeconflictionResult<Arc<Flight>> {
        let flight = self.registry.remove(flight_id)?;
        debug!(flight_id = %flight_id, "Unregistered scheduled flight");
        Ok(flight)
    }

    pub fn flight(&self, flight_id: &str) -> Option<Arc<Flight>> {
        self.registry.get(flight_id)
    }

    pub fn flight_ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Validate a candidate departing at `candidate_start` with an explicit buffer
    /// and sample resolution.
    pub fn validate(
        &self,
        candidate: &Trajectory,
        candidate_start: f64,
        buffer: f64,
        resolution: f64,
    ) -> DeconflictionResult<ValidationResult> {
        self.validate_with(
            candidate,
            candidate_start,
            &ValidationConfig::new(buffer, resolution),
        )
    }

    /// Validate a candidate against every scheduled flight.
    ///
    /// Records come back in ascending flight-id order, at most one per flight,
    /// whether flights are evaluated sequentially or in parallel.
    pub fn validate_with(
        &self,
        candidate: &Trajectory,
        candidate_start: f64,
        config: &ValidationConfig,
    ) -> DeconflictionResult<ValidationResult> {
        config.validate()?;
        if !candidate_start.is_finite() {
            return Err(DeconflictionError::InvalidConfiguration(format!(
                "candidate start time must be finite, got {candidate_start}"
            )));
        }

        let snapshot = self.registry.snapshot();
        let per_flight: Vec<Option<ConflictRecord>> = if config.parallel {
            snapshot
                .par_iter()
                .map(|flight| first_conflict(candidate, candidate_start, flight, config))
                .collect()
        } else {
            snapshot
                .iter()
                .map(|flight| first_conflict(candidate, candidate_start, flight, config))
                .collect()
        };

        let records: Vec<ConflictRecord> = per_flight.into_iter().flatten().collect();
        let result = ValidationResult::from_records(records);
        debug!(
            scheduled = snapshot.len(),
            conflicts = result.conflicts().len(),
            status = result.status(),
            parallel = config.parallel,
            "Validated candidate flight"
        );
        Ok(result)
    }
}

/// First sampled separation violation between a candidate and one scheduled flight.
///
/// Returns `None` without sampling when the occupancy windows are disjoint.
pub fn first_conflict(
    candidate: &Trajectory,
    candidate_start: f64,
    flight: &Flight,
    config: &ValidationConfig,
) -> Option<ConflictRecord> {
    let candidate_window = TimeWindow::new(candidate_start, candidate_start + candidate.duration());
    let Some(overlap) = candidate_window.overlap(&flight.window()) else {
        trace!(flight_id = %flight.id(), "No time overlap, skipping");
        return None;
    };

    let record = sample_instants(overlap, config.sample_resolution).find_map(|t| {
        let candidate_pos = candidate.position_clamped(t - candidate_start);
        let other_pos = flight.trajectory().position_clamped(t - flight.start_time());
        let separation = euclidean_distance(&candidate_pos, &other_pos);
        (separation < config.safety_buffer).then(|| ConflictRecord {
            flight_id: flight.id().to_string(),
            time: t,
            location: candidate_pos,
            separation,
        })
    });

    if let Some(record) = &record {
        trace!(
            flight_id = %record.flight_id,
            time = record.time,
            separation = record.separation,
            "Separation violation"
        );
    }
    record
}

/// Absolute sample times `start + k * resolution` strictly before `end`, then `end`.
///
/// Times are computed by multiplication so error does not accumulate over long
/// windows. A zero-length window yields its single instant.
pub fn sample_instants(window: TimeWindow, resolution: f64) -> impl Iterator<Item = f64> {
    let steps = (window.duration() / resolution).ceil().max(0.0) as usize;
    (0..steps)
        .map(move |k| window.start + k as f64 * resolution)
        .take_while(move |&t| t < window.end)
        .chain(iter::once(window.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn straight(from: [f64; 3], to: [f64; 3], speed: f64) -> Trajectory {
        Trajectory::new(vec![from.into(), to.into()], speed).unwrap()
    }

    #[test]
    fn test_sample_instants_include_window_end() {
        let samples: Vec<f64> = sample_instants(TimeWindow::new(0.0, 1.2), 0.5).collect();
        assert_eq!(samples, vec![0.0, 0.5, 1.0, 1.2]);
    }

    #[test]
    fn test_sample_instants_exact_multiple() {
        let samples: Vec<f64> = sample_instants(TimeWindow::new(2.0, 3.0), 0.5).collect();
        assert_eq!(samples, vec![2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_sample_instants_single_instant() {
        let samples: Vec<f64> = sample_instants(TimeWindow::new(4.0, 4.0), 0.5).collect();
        assert_eq!(samples, vec![4.0]);
    }

    #[test]
    fn test_sample_instants_never_exceed_end() {
        let window = TimeWindow::new(0.3, 10.0);
        let samples: Vec<f64> = sample_instants(window, 0.1).collect();
        assert!(samples.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(samples.last().copied(), Some(10.0));
        assert!(samples.iter().all(|&t| window.contains(t)));
    }

    #[test]
    fn test_first_conflict_skips_disjoint_windows() {
        let candidate = straight([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 1.0);
        let flight = Flight::new("B", candidate.clone(), 10.5);
        let config = ValidationConfig::default();

        assert!(first_conflict(&candidate, 0.0, &flight, &config).is_none());
    }

    #[test]
    fn test_first_conflict_reports_candidate_position() {
        let candidate = straight([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 1.0);
        let flight = Flight::new("B", straight([0.0, 1.0, 0.0], [10.0, 1.0, 0.0], 1.0), 3.0);
        let config = ValidationConfig::default();

        let record = first_conflict(&candidate, 0.0, &flight, &config).unwrap();
        // Overlap starts at t=3: candidate at x=3, flight at x=0 -> separation sqrt(10).
        assert_eq!(record.flight_id, "B");
        assert_eq!(record.time, 3.0);
        assert_eq!(record.location, Waypoint::new(3.0, 0.0, 0.0));
        assert!((record.separation - 10.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let engine = DeconflictionEngine::new();
        let candidate = straight([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 1.0);

        for (buffer, resolution) in [(0.0, 0.5), (5.0, 0.0), (-5.0, 0.5), (5.0, -1.0)] {
            assert!(matches!(
                engine.validate(&candidate, 0.0, buffer, resolution),
                Err(DeconflictionError::InvalidConfiguration(_))
            ));
        }
        assert!(matches!(
            engine.validate(&candidate, f64::NAN, 5.0, 0.5),
            Err(DeconflictionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_register_rejects_non_finite_start() {
        let engine = DeconflictionEngine::new();
        let flight = Flight::new("A", straight([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0), f64::INFINITY);

        assert!(matches!(
            engine.register(flight),
            Err(DeconflictionError::InvalidConfiguration(_))
        ));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_empty_registry_is_clear() {
        let engine = DeconflictionEngine::new();
        let candidate = straight([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 1.0);
        assert_eq!(
            engine.validate(&candidate, 0.0, 5.0, 0.5).unwrap(),
            ValidationResult::Clear
        );
    }
}
