//! Deterministic dataset builder for tests and demos.

use crate::dataset::{Dataset, OccupancySeries, Venue};
use crate::timekey::{TIME_SLOTS, TimeKey};

#[derive(Debug, Default)]
pub struct MockDatasetBuilder {
    venues: Vec<Venue>,
    skipped: usize,
}

impl MockDatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Venue with no occupancy series (weights resolve to zero).
    pub fn venue(mut self, lon: f64, lat: f64) -> Self {
        self.venues.push(Venue::at(lon, lat));
        self
    }

    /// Venue whose occupancy is the same value for every slot of the week.
    pub fn venue_with_flat_occupancy(mut self, lon: f64, lat: f64, occupancy: f64) -> Self {
        let mut venue = Venue::at(lon, lat);
        venue.occupancy = Some(OccupancySeries::new([occupancy; TIME_SLOTS]));
        self.venues.push(venue);
        self
    }

    /// Venue occupied only in a single time slot.
    pub fn venue_with_slot(mut self, lon: f64, lat: f64, key: TimeKey, occupancy: f64) -> Self {
        let mut series = [0.0; TIME_SLOTS];
        series[key.index()] = occupancy;
        let mut venue = Venue::at(lon, lat);
        venue.occupancy = Some(OccupancySeries::new(series));
        self.venues.push(venue);
        self
    }

    /// Venue with explicit per-slot values.
    pub fn venue_with_series(mut self, lon: f64, lat: f64, series: [f64; TIME_SLOTS]) -> Self {
        let mut venue = Venue::at(lon, lat);
        venue.occupancy = Some(OccupancySeries::new(series));
        self.venues.push(venue);
        self
    }

    /// Venue with unusable coordinates, as left behind by a malformed feed.
    pub fn invalid_venue(mut self) -> Self {
        self.venues.push(Venue::at(f64::NAN, f64::NAN));
        self
    }

    /// Record input features that the parse step would have skipped.
    pub fn skipped(mut self, count: usize) -> Self {
        self.skipped += count;
        self
    }

    pub fn build(self) -> Dataset {
        Dataset {
            venues: self.venues,
            skipped: self.skipped,
        }
    }
}
