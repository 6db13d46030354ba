//! Thread-safe registry of scheduled flights.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{DeconflictionError, DeconflictionResult};
use crate::models::Flight;

/// Scheduled flights keyed by id, iterated in ascending id order.
///
/// Writers take the write lock; readers clone an ordered snapshot of `Arc<Flight>`
/// handles and release the lock before doing any work.
#[derive(Debug, Default)]
pub struct FlightRegistry {
    flights: RwLock<BTreeMap<String, Arc<Flight>>>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flight. Fails without touching the registry if the id is taken.
    pub fn insert(&self, flight: Flight) -> DeconflictionResult<()> {
        let mut flights = self.write();
        if flights.contains_key(flight.id()) {
            return Err(DeconflictionError::DuplicateFlightId(flight.id().to_string()));
        }
        flights.insert(flight.id().to_string(), Arc::new(flight));
        Ok(())
    }

    /// Remove and return a flight.
    pub fn remove(&self, flight_id: &str) -> DeconflictionResult<Arc<Flight>> {
        self.write()
            .remove(flight_id)
            .ok_or_else(|| DeconflictionError::UnknownFlightId(flight_id.to_string()))
    }

    pub fn get(&self, flight_id: &str) -> Option<Arc<Flight>> {
        self.read().get(flight_id).cloned()
    }

    pub fn contains(&self, flight_id: &str) -> bool {
        self.read().contains_key(flight_id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Immutable view of every flight, in ascending id order.
    pub fn snapshot(&self) -> Vec<Arc<Flight>> {
        self.read().values().cloned().collect()
    }

    // A panicking holder cannot leave the map half-updated, so poisoned locks are
    // recovered rather than propagated.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<Flight>>> {
        self.flights.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<Flight>>> {
        self.flights.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;
    use crate::trajectory::Trajectory;

    fn flight(id: &str) -> Flight {
        let trajectory = Trajectory::new(
            vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
            1.0,
        )
        .unwrap();
        Flight::new(id, trajectory, 0.0)
    }

    #[test]
    fn test_snapshot_is_sorted_by_id() {
        let registry = FlightRegistry::new();
        for id in ["charlie", "alpha", "bravo"] {
            registry.insert(flight(id)).unwrap();
        }

        let ids: Vec<String> = registry
            .snapshot()
            .iter()
            .map(|f| f.id().to_string())
            .collect();
        assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
        assert_eq!(registry.ids(), ids);
    }

    #[test]
    fn test_duplicate_insert_leaves_registry_unchanged() {
        let registry = FlightRegistry::new();
        registry.insert(flight("A")).unwrap();

        let replacement = Flight::new("A", flight("A").trajectory().clone(), 99.0);
        assert_eq!(
            registry.insert(replacement),
            Err(DeconflictionError::DuplicateFlightId("A".to_string()))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("A").unwrap().start_time(), 0.0);
    }

    #[test]
    fn test_remove_unknown_fails() {
        let registry = FlightRegistry::new();
        assert_eq!(
            registry.remove("ghost").unwrap_err(),
            DeconflictionError::UnknownFlightId("ghost".to_string())
        );

        registry.insert(flight("A")).unwrap();
        assert_eq!(registry.remove("A").unwrap().id(), "A");
        assert!(registry.is_empty());
        assert!(!registry.contains("A"));
    }

    #[test]
    fn test_snapshot_survives_later_removal() {
        let registry = FlightRegistry::new();
        registry.insert(flight("A")).unwrap();
        let snapshot = registry.snapshot();
        registry.remove("A").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), "A");
    }
}
