use crate::timekey::{TIME_SLOTS, TimeKey};

pub mod geojson;
pub mod mock;

pub type VenueId = u64;

/// Weekly occupancy series: one raw value per hour of a Sunday-first week.
///
/// Values are kept as parsed (nominally 0..100); clamping and the 0..1
/// rescale happen in the weight function so a single malformed entry never
/// poisons the series.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancySeries(Box<[f64; TIME_SLOTS]>);

impl OccupancySeries {
    pub fn new(values: [f64; TIME_SLOTS]) -> Self {
        Self(Box::new(values))
    }

    /// Build from a slice, taking the first 168 values. Shorter slices are
    /// rejected, matching the source data contract.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        if values.len() < TIME_SLOTS {
            return None;
        }
        let mut series = [0.0; TIME_SLOTS];
        series.copy_from_slice(&values[..TIME_SLOTS]);
        Some(Self(Box::new(series)))
    }

    pub fn value_at(&self, key: TimeKey) -> f64 {
        self.0[key.index()]
    }
}

/// One validated point feature: a restaurant venue with its position and
/// the property payload the report cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub venue_id: Option<VenueId>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub reviews_count: u32,
    pub lon: f64,
    pub lat: f64,
    pub occupancy: Option<OccupancySeries>,
}

impl Venue {
    pub fn at(lon: f64, lat: f64) -> Self {
        Self {
            venue_id: None,
            name: None,
            category: None,
            reviews_count: 0,
            lon,
            lat,
            occupancy: None,
        }
    }
}

/// Result of the boundary parse: validated venues plus the count of input
/// features that had to be skipped (non-point geometry, non-finite
/// coordinates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub venues: Vec<Venue>,
    pub skipped: usize,
}

impl Dataset {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues, skipped: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_from_slice_requires_full_week() {
        let short = vec![1.0; TIME_SLOTS - 1];
        assert!(OccupancySeries::from_slice(&short).is_none());

        let full = vec![2.0; TIME_SLOTS];
        let series = OccupancySeries::from_slice(&full).expect("full series");
        assert_eq!(series.value_at(TimeKey::new(0, 0)), 2.0);
        assert_eq!(series.value_at(TimeKey::new(6, 23)), 2.0);
    }

    #[test]
    fn occupancy_truncates_overlong_input() {
        let mut long = vec![1.0; TIME_SLOTS];
        long.push(99.0);
        let series = OccupancySeries::from_slice(&long).expect("series");
        assert_eq!(series.value_at(TimeKey::new(6, 23)), 1.0);
    }
}
