//! Mission file format: a primary flight plus the scheduled traffic around it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use deconflict_core::{
    epoch_seconds, DeconflictionEngine, DeconflictionResult, Flight, Trajectory, Waypoint,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::Config;

pub const DEFAULT_SPEED: f64 = 5.0;

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

/// Departure time, either calendar or already on the linear seconds axis.
///
/// Calendar times become seconds since the Unix epoch, so a mission should not mix
/// the two forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    Timestamp(DateTime<Utc>),
    Seconds(f64),
}

impl Default for StartTime {
    fn default() -> Self {
        StartTime::Seconds(0.0)
    }
}

impl StartTime {
    pub fn as_seconds(&self) -> f64 {
        match self {
            StartTime::Timestamp(timestamp) => epoch_seconds(*timestamp),
            StartTime::Seconds(seconds) => *seconds,
        }
    }
}

/// One drone's planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSpec {
    pub id: String,
    /// Waypoints as `[x, y, z]`
    pub waypoints: Vec<[f64; 3]>,
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Per-segment speeds; overrides `speed` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_speeds: Option<Vec<f64>>,
    #[serde(default)]
    pub start_time: StartTime,
}

impl FlightSpec {
    pub fn new(id: impl Into<String>, waypoints: Vec<[f64; 3]>, speed: f64, start: f64) -> Self {
        Self {
            id: id.into(),
            waypoints,
            speed,
            segment_speeds: None,
            start_time: StartTime::Seconds(start),
        }
    }

    pub fn trajectory(&self) -> DeconflictionResult<Trajectory> {
        let waypoints: Vec<Waypoint> = self.waypoints.iter().copied().map(Waypoint::from).collect();
        match &self.segment_speeds {
            Some(speeds) => Trajectory::with_segment_speeds(waypoints, speeds),
            None => Trajectory::new(waypoints, self.speed),
        }
    }

    pub fn to_flight(&self) -> DeconflictionResult<Flight> {
        Ok(Flight::new(
            self.id.clone(),
            self.trajectory()?,
            self.start_time.as_seconds(),
        ))
    }
}

/// Top-level mission document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_buffer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_resolution: Option<f64>,
    pub primary: FlightSpec,
    #[serde(default)]
    pub scheduled: Vec<FlightSpec>,
}

impl MissionFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read mission file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid mission file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Settings carried by the mission, as a config layer.
    pub fn config_layer(&self) -> Config {
        Config {
            safety_buffer: self.safety_buffer,
            sample_resolution: self.sample_resolution,
            parallel: None,
        }
    }

    /// Build an engine holding every scheduled flight.
    pub fn build_engine(&self) -> Result<DeconflictionEngine> {
        let engine = DeconflictionEngine::new();
        for spec in &self.scheduled {
            let flight = spec
                .to_flight()
                .with_context(|| format!("scheduled flight '{}'", spec.id))?;
            engine
                .register(flight)
                .with_context(|| format!("scheduled flight '{}'", spec.id))?;
        }
        Ok(engine)
    }
}
