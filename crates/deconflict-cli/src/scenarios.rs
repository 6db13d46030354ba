//! Built-in demo missions and random traffic generation.

use anyhow::{ensure, Result};
use deconflict_core::{Flight, Trajectory, Waypoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mission::{FlightSpec, MissionFile, StartTime, DEFAULT_SPEED};

/// Named mission shipped with the CLI.
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> MissionFile,
}

impl Scenario {
    pub fn mission(&self) -> MissionFile {
        (self.build)()
    }
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "crossing",
        description: "Cargo drone crosses the primary route at cruise altitude; survey drone passes 60m above",
        build: crossing,
    },
    Scenario {
        name: "staggered",
        description: "Same crossing geometry, cargo drone departs after the primary has landed",
        build: staggered,
    },
    Scenario {
        name: "corridor",
        description: "Escort flies parallel 4m off the primary track for the whole route",
        build: corridor,
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

fn primary_alpha() -> FlightSpec {
    FlightSpec::new(
        "Primary_Alpha",
        vec![[50.0, 0.0, 20.0], [50.0, 100.0, 20.0]],
        DEFAULT_SPEED,
        0.0,
    )
}

fn crossing() -> MissionFile {
    MissionFile {
        safety_buffer: Some(10.0),
        sample_resolution: None,
        primary: primary_alpha(),
        scheduled: vec![
            FlightSpec::new(
                "Drone_B_Cargo",
                vec![[0.0, 50.0, 20.0], [100.0, 50.0, 20.0]],
                DEFAULT_SPEED,
                0.0,
            ),
            FlightSpec::new(
                "Drone_C_Survey",
                vec![[50.0, 0.0, 80.0], [50.0, 100.0, 80.0]],
                DEFAULT_SPEED,
                0.0,
            ),
        ],
    }
}

fn staggered() -> MissionFile {
    let mut mission = crossing();
    // Primary lands at t=20.
    mission.scheduled[0].start_time = StartTime::Seconds(25.0);
    mission
}

fn corridor() -> MissionFile {
    MissionFile {
        safety_buffer: Some(5.0),
        sample_resolution: Some(0.5),
        primary: primary_alpha(),
        scheduled: vec![FlightSpec::new(
            "Escort_E",
            vec![[54.0, 0.0, 20.0], [54.0, 100.0, 20.0]],
            DEFAULT_SPEED,
            0.0,
        )],
    }
}

/// Bounds for randomly generated traffic.
#[derive(Debug, Clone, Copy)]
pub struct TrafficArea {
    /// Horizontal extent of the square area, starting at the origin
    pub extent: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
    /// Departures fall in `[0, horizon)`
    pub horizon: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for TrafficArea {
    fn default() -> Self {
        Self {
            extent: 1_000.0,
            min_altitude: 10.0,
            max_altitude: 120.0,
            horizon: 600.0,
            min_speed: 5.0,
            max_speed: 20.0,
        }
    }
}

impl TrafficArea {
    /// Reject areas whose sampling ranges would be empty or unbounded.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.extent,
            self.min_altitude,
            self.max_altitude,
            self.horizon,
            self.min_speed,
            self.max_speed,
        ]
        .iter()
        .all(|value| value.is_finite());
        ensure!(finite, "traffic area values must be finite");
        ensure!(self.extent > 0.0, "extent must be positive, got {}", self.extent);
        ensure!(self.horizon > 0.0, "horizon must be positive, got {}", self.horizon);
        ensure!(
            self.min_altitude <= self.max_altitude,
            "altitude range {}..={} is empty",
            self.min_altitude,
            self.max_altitude
        );
        ensure!(
            self.min_speed > 0.0 && self.min_speed <= self.max_speed,
            "speed range {}..={} must be positive and non-empty",
            self.min_speed,
            self.max_speed
        );
        Ok(())
    }
}

/// Generate `count` straight-line flights with reproducible ids `traffic-NNNNN`.
pub fn random_traffic(count: usize, seed: u64, area: &TrafficArea) -> Result<Vec<Flight>> {
    area.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut flights = Vec::with_capacity(count);

    while flights.len() < count {
        let from = random_point(&mut rng, area);
        let to = random_point(&mut rng, area);
        let speed = rng.random_range(area.min_speed..=area.max_speed);
        // Coincident endpoints are rejected by the trajectory model; draw again.
        let Ok(trajectory) = Trajectory::new(vec![from, to], speed) else {
            continue;
        };
        let start = rng.random_range(0.0..area.horizon);
        flights.push(Flight::new(
            format!("traffic-{:05}", flights.len()),
            trajectory,
            start,
        ));
    }

    Ok(flights)
}

fn random_point(rng: &mut StdRng, area: &TrafficArea) -> Waypoint {
    Waypoint::new(
        rng.random_range(0.0..area.extent),
        rng.random_range(0.0..area.extent),
        rng.random_range(area.min_altitude..=area.max_altitude),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn run(name: &str) -> deconflict_core::ValidationResult {
        let mission = find(name).unwrap().mission();
        let engine = mission.build_engine().unwrap();
        let primary = mission.primary.to_flight().unwrap();
        engine
            .validate_with(
                primary.trajectory(),
                primary.start_time(),
                &Config::resolve(&[mission.config_layer()]),
            )
            .unwrap()
    }

    #[test]
    fn test_crossing_flags_only_cargo_drone() {
        let result = run("crossing");
        assert_eq!(result.conflicts().len(), 1);
        assert_eq!(result.conflicts()[0].flight_id, "Drone_B_Cargo");
    }

    #[test]
    fn test_staggered_is_clear() {
        assert!(run("staggered").is_clear());
    }

    #[test]
    fn test_corridor_conflicts_at_departure() {
        let result = run("corridor");
        let record = &result.conflicts()[0];
        assert_eq!(record.time, 0.0);
        assert_eq!(record.separation, 4.0);
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_random_traffic_is_reproducible() {
        let area = TrafficArea::default();
        let first = random_traffic(25, 7, &area).unwrap();
        let second = random_traffic(25, 7, &area).unwrap();

        assert_eq!(first.len(), 25);
        assert_eq!(first, second);
        assert_eq!(first[3].id(), "traffic-00003");
        assert!(first
            .iter()
            .all(|flight| flight.start_time() >= 0.0 && flight.start_time() < area.horizon));
    }

    #[test]
    fn test_random_traffic_rejects_degenerate_area() {
        let no_horizon = TrafficArea {
            horizon: 0.0,
            ..TrafficArea::default()
        };
        let err = random_traffic(3, 1, &no_horizon).unwrap_err();
        assert!(err.to_string().contains("horizon"));

        let no_extent = TrafficArea {
            extent: 0.0,
            ..TrafficArea::default()
        };
        assert!(random_traffic(3, 1, &no_extent).is_err());

        let inverted_speeds = TrafficArea {
            min_speed: 20.0,
            max_speed: 5.0,
            ..TrafficArea::default()
        };
        assert!(random_traffic(3, 1, &inverted_speeds).is_err());
        assert!(random_traffic(0, 1, &TrafficArea::default()).unwrap().is_empty());
    }
}
