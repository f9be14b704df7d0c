//! Uniform rectangular grid over a venue extent.
//!
//! Cell steps are sized in meters and converted to degrees with the local
//! latitude-dependent scale factor, then uniformly coarsened when the naive
//! cell count would blow past the safety cap. Cell ids are row-major
//! (`row * cols + col`), assigned once at construction; they are the join
//! key between geometry and every per-time-slot result.

use crate::grid::extent::Extent;

pub mod binning;
pub mod extent;

pub const METERS_PER_DEG_LAT: f64 = 111_320.0;
/// Keeps the longitude scale factor finite near the poles.
const MIN_COS_LAT: f64 = 1e-6;

pub const DEFAULT_CELL_SIZE_METERS: f64 = 500.0;
pub const DEFAULT_CELL_SIZE_DEGREES: f64 = 0.01;
pub const DEFAULT_MAX_CELLS: usize = 4000;

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub cell_size_meters: Option<f64>,
    /// Legacy fallback when no meter size is given.
    pub cell_size_degrees: Option<f64>,
    pub max_cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size_meters: Some(DEFAULT_CELL_SIZE_METERS),
            cell_size_degrees: None,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

/// Rectangular bounds of one cell, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
    pub lat_step: f64,
    pub lng_step: f64,
}

impl Grid {
    /// Build a grid over the extent. Deterministic for identical inputs.
    ///
    /// The extent is padded outward by one cell step per side so edge
    /// venues land fully inside, and the max edges are recomputed after
    /// sizing so the cells exactly tile the padded area (possibly slightly
    /// past it, never short of it). Ceiling rounding after downscaling may
    /// leave the final count within one row/column of `max_cells`.
    pub fn build(extent: &Extent, config: &GridConfig) -> Self {
        let cos_lat = extent.mean_lat().to_radians().cos().max(MIN_COS_LAT);
        let meters_per_deg_lng = METERS_PER_DEG_LAT * cos_lat;

        let (mut lat_step, mut lng_step) = match config.cell_size_meters {
            Some(meters) if meters > 0.0 => {
                (meters / METERS_PER_DEG_LAT, meters / meters_per_deg_lng)
            }
            _ => {
                let degrees = config
                    .cell_size_degrees
                    .filter(|d| *d > 0.0)
                    .unwrap_or(DEFAULT_CELL_SIZE_DEGREES);
                (degrees, degrees)
            }
        };

        let min_lat = extent.min_lat - lat_step;
        let min_lng = extent.min_lng - lng_step;
        let mut max_lat = extent.max_lat + lat_step;
        let mut max_lng = extent.max_lng + lng_step;

        let approx_cols = (((max_lng - min_lng) / lng_step).round() as usize).max(1);
        let approx_rows = (((max_lat - min_lat) / lat_step).round() as usize).max(1);
        let max_cells = config.max_cells.max(1);
        if approx_cols * approx_rows > max_cells {
            let scale = ((approx_cols * approx_rows) as f64 / max_cells as f64).sqrt();
            lng_step *= scale;
            lat_step *= scale;
        }

        let cols = (((max_lng - min_lng) / lng_step).ceil() as usize).max(1);
        let rows = (((max_lat - min_lat) / lat_step).ceil() as usize).max(1);
        max_lng = min_lng + cols as f64 * lng_step;
        max_lat = min_lat + rows as f64 * lat_step;

        Self {
            rows,
            cols,
            min_lat,
            min_lng,
            max_lat,
            max_lng,
            lat_step,
            lng_step,
        }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell_id(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn cell_bounds(&self, id: usize) -> CellBounds {
        let row = id / self.cols;
        let col = id % self.cols;
        let west = self.min_lng + col as f64 * self.lng_step;
        let south = self.min_lat + row as f64 * self.lat_step;
        CellBounds {
            west,
            south,
            east: west + self.lng_step,
            north: south + self.lat_step,
        }
    }

    /// Cell center as (lon, lat).
    pub fn cell_center(&self, id: usize) -> (f64, f64) {
        let bounds = self.cell_bounds(id);
        (
            (bounds.west + bounds.east) / 2.0,
            (bounds.south + bounds.north) / 2.0,
        )
    }

    /// Closed exterior ring of the cell polygon, as (lon, lat) pairs.
    pub fn cell_ring(&self, id: usize) -> [[f64; 2]; 5] {
        let CellBounds {
            west,
            south,
            east,
            north,
        } = self.cell_bounds(id);
        [
            [west, south],
            [east, south],
            [east, north],
            [west, north],
            [west, south],
        ]
    }

    /// Column for a longitude, clamped to grid bounds.
    pub fn col_for_lng(&self, lng: f64) -> usize {
        let raw = ((lng - self.min_lng) / self.lng_step).floor();
        (raw as isize).clamp(0, self.cols as isize - 1) as usize
    }

    /// Row for a latitude, clamped to grid bounds.
    pub fn row_for_lat(&self, lat: f64) -> usize {
        let raw = ((lat - self.min_lat) / self.lat_step).floor();
        (raw as isize).clamp(0, self.rows as isize - 1) as usize
    }

    /// Cell id for a position; marginally outside positions are clamped to
    /// the nearest edge cell rather than rejected.
    pub fn cell_for(&self, lon: f64, lat: f64) -> usize {
        self.cell_id(self.row_for_lat(lat), self.col_for_lng(lon))
    }

    /// Cell area in km², using the same latitude scale as the sizing step.
    pub fn cell_area_km2(&self) -> f64 {
        let cos_lat = self.mean_lat().to_radians().cos().max(MIN_COS_LAT);
        let width_m = self.lng_step * METERS_PER_DEG_LAT * cos_lat;
        let height_m = self.lat_step * METERS_PER_DEG_LAT;
        width_m * height_m / 1e6
    }

    fn mean_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> Extent {
        Extent {
            min_lat: 29.6,
            min_lng: -95.6,
            max_lat: 29.9,
            max_lng: -95.2,
        }
    }

    #[test]
    fn meter_steps_use_latitude_scale() {
        let config = GridConfig {
            cell_size_meters: Some(1000.0),
            cell_size_degrees: None,
            max_cells: DEFAULT_MAX_CELLS,
        };
        let grid = Grid::build(&extent(), &config);

        let expected_lat_step = 1000.0 / METERS_PER_DEG_LAT;
        let cos_lat = 29.75_f64.to_radians().cos();
        let expected_lng_step = 1000.0 / (METERS_PER_DEG_LAT * cos_lat);
        assert!((grid.lat_step - expected_lat_step).abs() < 1e-12);
        assert!((grid.lng_step - expected_lng_step).abs() < 1e-12);
        // Longitude degrees shrink with latitude, so the lng step is wider.
        assert!(grid.lng_step > grid.lat_step);
    }

    #[test]
    fn degree_fallback_applies_when_meters_missing() {
        let config = GridConfig {
            cell_size_meters: None,
            cell_size_degrees: Some(0.05),
            max_cells: DEFAULT_MAX_CELLS,
        };
        let grid = Grid::build(&extent(), &config);

        assert_eq!(grid.lat_step, 0.05);
        assert_eq!(grid.lng_step, 0.05);
    }

    #[test]
    fn extent_is_padded_and_exactly_tiled() {
        let config = GridConfig {
            cell_size_meters: None,
            cell_size_degrees: Some(0.05),
            max_cells: DEFAULT_MAX_CELLS,
        };
        let e = extent();
        let grid = Grid::build(&e, &config);

        assert!(grid.min_lat < e.min_lat);
        assert!(grid.min_lng < e.min_lng);
        // The far edges tile exactly from the min corner.
        let tiled_lng = grid.min_lng + grid.cols as f64 * grid.lng_step;
        let tiled_lat = grid.min_lat + grid.rows as f64 * grid.lat_step;
        assert_eq!(grid.max_lng, tiled_lng);
        assert_eq!(grid.max_lat, tiled_lat);
        // Never short of the padded extent.
        assert!(grid.max_lng >= e.max_lng + 0.05);
        assert!(grid.max_lat >= e.max_lat + 0.05);
    }

    #[test]
    fn cell_budget_scales_resolution_uniformly() {
        let config = GridConfig {
            cell_size_meters: Some(100.0),
            cell_size_degrees: None,
            max_cells: 100,
        };
        let grid = Grid::build(&extent(), &config);

        // Within one extra row/column of the cap after ceiling rounding.
        assert!(grid.len() <= 100 + grid.rows + grid.cols);
        // Aspect ratio is preserved: both steps scaled by the same factor.
        let cos_lat = 29.75_f64.to_radians().cos();
        let lat_ratio = grid.lat_step / (100.0 / METERS_PER_DEG_LAT);
        let lng_ratio = grid.lng_step / (100.0 / (METERS_PER_DEG_LAT * cos_lat));
        assert!((lat_ratio - lng_ratio).abs() < 1e-9);
        assert!(lat_ratio > 1.0);
    }

    #[test]
    fn downscaled_grid_still_covers_padded_extent() {
        let config = GridConfig {
            cell_size_meters: Some(100.0),
            cell_size_degrees: None,
            max_cells: 100,
        };
        let naive = GridConfig {
            cell_size_meters: Some(100.0),
            cell_size_degrees: None,
            max_cells: usize::MAX,
        };
        let e = extent();
        let grid = Grid::build(&e, &config);
        let unscaled = Grid::build(&e, &naive);

        assert!(grid.len() < unscaled.len());
        // Padded extent edges (one original step beyond the data).
        assert!(grid.max_lng >= e.max_lng + unscaled.lng_step);
        assert!(grid.max_lat >= e.max_lat + unscaled.lat_step);
        assert!(grid.min_lng <= e.min_lng - unscaled.lng_step);
        assert!(grid.min_lat <= e.min_lat - unscaled.lat_step);
    }

    #[test]
    fn building_twice_is_deterministic() {
        let config = GridConfig::default();
        let a = Grid::build(&extent(), &config);
        let b = Grid::build(&extent(), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn cell_ids_are_row_major_and_bounds_disjoint() {
        let config = GridConfig {
            cell_size_meters: None,
            cell_size_degrees: Some(0.1),
            max_cells: DEFAULT_MAX_CELLS,
        };
        let grid = Grid::build(&extent(), &config);

        assert_eq!(grid.cell_id(0, 0), 0);
        assert_eq!(grid.cell_id(1, 0), grid.cols);

        let first = grid.cell_bounds(0);
        let right = grid.cell_bounds(1);
        let up = grid.cell_bounds(grid.cols);
        assert_eq!(first.east, right.west);
        assert_eq!(first.north, up.south);
        assert!(first.east > first.west);
        assert!(first.north > first.south);
    }

    #[test]
    fn cell_ring_is_closed() {
        let grid = Grid::build(&extent(), &GridConfig::default());
        let ring = grid.cell_ring(0);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn degenerate_extent_still_produces_cells() {
        let point_extent = Extent {
            min_lat: 29.7,
            min_lng: -95.3,
            max_lat: 29.7,
            max_lng: -95.3,
        };
        let grid = Grid::build(&point_extent, &GridConfig::default());
        assert!(grid.len() >= 1);
        assert!(grid.lat_step > 0.0);
        assert!(grid.lng_step > 0.0);
    }

    #[test]
    fn cell_area_matches_step_sizes() {
        let config = GridConfig {
            cell_size_meters: Some(500.0),
            cell_size_degrees: None,
            max_cells: DEFAULT_MAX_CELLS,
        };
        let grid = Grid::build(&extent(), &config);
        // 500 m cells are 0.25 km²; padding shifts the mean latitude only
        // slightly, so allow a small tolerance.
        assert!((grid.cell_area_km2() - 0.25).abs() < 0.01);
    }
}
