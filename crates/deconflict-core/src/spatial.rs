//! Spatial and temporal math for conflict detection.

use serde::{Deserialize, Serialize};

use crate::models::Waypoint;

/// Standard 3D Euclidean distance.
pub fn euclidean_distance(a: &Waypoint, b: &Waypoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Closed interval on the absolute time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Intersection of two windows. Windows touching at one instant overlap there.
    pub fn overlap(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end {
            return None;
        }
        Some(TimeWindow { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance_known_values() {
        let a = Waypoint::new(0.0, 0.0, 0.0);
        let b = Waypoint::new(3.0, 4.0, 12.0);
        assert_eq!(euclidean_distance(&a, &b), 13.0);
        assert_eq!(euclidean_distance(&b, &b), 0.0);
    }

    #[test]
    fn test_overlap_of_disjoint_windows_is_none() {
        let a = TimeWindow::new(0.0, 10.0);
        let b = TimeWindow::new(10.5, 20.0);
        assert!(a.overlap(&b).is_none());
        assert!(b.overlap(&a).is_none());
    }

    #[test]
    fn test_overlap_is_intersection() {
        let a = TimeWindow::new(0.0, 10.0);
        let b = TimeWindow::new(4.0, 20.0);
        assert_eq!(a.overlap(&b), Some(TimeWindow::new(4.0, 10.0)));
    }

    #[test]
    fn test_touching_windows_overlap_at_single_instant() {
        let a = TimeWindow::new(0.0, 10.0);
        let b = TimeWindow::new(10.0, 20.0);
        let overlap = a.overlap(&b).unwrap();
        assert_eq!(overlap.duration(), 0.0);
        assert!(overlap.contains(10.0));
    }
}
