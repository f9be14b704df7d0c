//! Point-to-cell assignment, computed once per (grid, dataset) pair.
//!
//! Binning is the only spatial search in the pipeline. It runs a single
//! O(points) pass when the grid is built; every later re-aggregation for a
//! new time slot reuses the stored cell ids and never repeats the search.

use crate::dataset::Venue;
use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    cells: Vec<usize>,
}

impl Assignment {
    /// Assign every venue to exactly one cell id. Positions outside the
    /// grid (or unusable ones that survived upstream filtering) clamp to
    /// the nearest edge cell, so the partition is total.
    pub fn build(grid: &Grid, venues: &[Venue]) -> Self {
        let cells = venues
            .iter()
            .map(|venue| grid.cell_for(venue.lon, venue.lat))
            .collect();
        Self { cells }
    }

    pub fn cell_of(&self, venue_index: usize) -> usize {
        self.cells[venue_index]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().copied()
    }
}
