//! Working set of displayed locations
//!
//! Coordinate probes are merged into the set instead of piling up: a probe
//! that lands within [`PROBE_TOLERANCE`] degrees of an existing entry on both
//! axes replaces that entry in place, anything else is appended.

use crate::data::WeatherLocation;

/// Maximum distance in degrees, per axis, for a probe to replace an entry
pub const PROBE_TOLERANCE: f64 = 0.01;

/// Where a probed location ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// An existing entry at this index was replaced
    Replaced(usize),
    /// The location was appended at this index
    Appended(usize),
}

impl Placement {
    pub fn index(&self) -> usize {
        match self {
            Placement::Replaced(i) | Placement::Appended(i) => *i,
        }
    }
}

/// Ordered list of locations shown to the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSet {
    locations: Vec<WeatherLocation>,
}

impl LocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_locations(locations: Vec<WeatherLocation>) -> Self {
        Self { locations }
    }

    /// Replaces the whole set, e.g. after a bulk fetch settles
    pub fn replace_all(&mut self, locations: Vec<WeatherLocation>) {
        self.locations = locations;
    }

    /// Merges a probe result for the coordinates that were requested.
    ///
    /// The first entry within tolerance of (`latitude`, `longitude`) on both
    /// axes is replaced at its position; otherwise the location is appended.
    pub fn upsert_probe(
        &mut self,
        latitude: f64,
        longitude: f64,
        location: WeatherLocation,
    ) -> Placement {
        match self
            .locations
            .iter()
            .position(|existing| existing.is_near(latitude, longitude, PROBE_TOLERANCE))
        {
            Some(index) => {
                self.locations[index] = location;
                Placement::Replaced(index)
            }
            None => {
                self.locations.push(location);
                Placement::Appended(self.locations.len() - 1)
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&WeatherLocation> {
        self.locations.get(index)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&WeatherLocation> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn position_by_id(&self, id: &str) -> Option<usize> {
        self.locations.iter().position(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherLocation> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn as_slice(&self) -> &[WeatherLocation] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SeededSimulation, SimulationSource};

    fn probe(latitude: f64, longitude: f64) -> WeatherLocation {
        SeededSimulation::anchored_at(chrono::Utc::now()).location_at(latitude, longitude)
    }

    #[test]
    fn test_close_probe_replaces_in_place() {
        let mut set = LocationSet::new();
        set.upsert_probe(10.0, 20.0, probe(10.0, 20.0));
        set.upsert_probe(50.0, 50.0, probe(50.0, 50.0));

        let placement = set.upsert_probe(10.009, 20.009, probe(10.009, 20.009));

        assert_eq!(placement, Placement::Replaced(0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().latitude, 10.009);
        assert_eq!(set.get(1).unwrap().latitude, 50.0);
    }

    #[test]
    fn test_distant_probe_appends() {
        let mut set = LocationSet::new();
        set.upsert_probe(10.0, 20.0, probe(10.0, 20.0));

        let placement = set.upsert_probe(10.02, 20.0, probe(10.02, 20.0));

        assert_eq!(placement, Placement::Appended(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_both_axes_must_be_close() {
        let mut set = LocationSet::new();
        set.upsert_probe(10.0, 20.0, probe(10.0, 20.0));

        assert_eq!(
            set.upsert_probe(10.005, 20.05, probe(10.005, 20.05)),
            Placement::Appended(1)
        );
    }

    #[test]
    fn test_exact_tolerance_is_not_close() {
        let mut set = LocationSet::new();
        set.upsert_probe(0.0, 0.0, probe(0.0, 0.0));
        assert_eq!(set.upsert_probe(0.0, 0.01, probe(0.0, 0.01)), Placement::Appended(1));
    }

    #[test]
    fn test_probe_can_replace_a_bulk_entry() {
        let mut set = LocationSet::from_locations(SeededSimulation::new().locations());
        let before = set.len();

        // New York is loc-0 at 40.7128, -74.0060
        let placement = set.upsert_probe(40.713, -74.006, probe(40.713, -74.006));

        assert_eq!(placement, Placement::Replaced(0));
        assert_eq!(set.len(), before);
        assert_eq!(set.position_by_id("coord-40.7130--74.0060"), Some(0));
        assert!(set.find_by_id("loc-0").is_none());
    }

    #[test]
    fn test_replace_all() {
        let mut set = LocationSet::new();
        set.upsert_probe(1.0, 1.0, probe(1.0, 1.0));
        set.replace_all(SeededSimulation::new().locations());
        assert_eq!(set.len(), 12);
        assert!(!set.is_empty());
        assert_eq!(set.iter().count(), set.as_slice().len());
    }
}
