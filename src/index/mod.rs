use crate::config::NormalizationSection;
use crate::dataset::{Dataset, Venue};
use crate::error::AppError;
use crate::grid::binning::Assignment;
use crate::grid::extent::Extent;
use crate::grid::{Grid, GridConfig};
use crate::state::{AppState, IndexSnapshot};
use crate::throttle::{TrailingThrottle, sleep_with_stop};
use crate::timekey::TimeKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};
use thiserror::Error;
use tracing::warn;

pub mod cache;
pub mod fixed;
pub mod minmax;
pub mod normalizer;
pub mod quantile;

use cache::TemporalCache;
use fixed::FixedDomainNormalizer;
use minmax::MinMaxNormalizer;
use normalizer::Normalizer;
use quantile::QuantileNormalizer;

/// How often the recompute worker checks for due requests.
const WORKER_POLL_STEP: Duration = Duration::from_millis(25);

// Strategy factory
pub fn create_normalizer(
    section: &NormalizationSection,
) -> Result<Box<dyn Normalizer>, NormalizerError> {
    let ignore_zeros = section.ignore_zeros.unwrap_or(true);
    match section.kind.as_deref().unwrap_or("minmax") {
        "minmax" => Ok(Box::new(MinMaxNormalizer::new(ignore_zeros))),
        "fixed" => {
            let domain = section.domain.ok_or(NormalizerError::MissingDomain)?;
            Ok(Box::new(FixedDomainNormalizer::new(domain)))
        }
        "quantile" => Ok(Box::new(QuantileNormalizer::new(ignore_zeros))),
        other => Err(NormalizerError::Unknown(other.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum NormalizerError {
    #[error("unknown normalization strategy: {0}")]
    Unknown(String),
    #[error("fixed normalization requires a [min, max] domain")]
    MissingDomain,
}

/// Weight of one venue at a time slot: the occupancy value clamped into
/// 0..100 and rescaled to 0..1. Missing series and non-finite entries
/// contribute zero, never NaN.
pub fn occupancy_weight(venue: &Venue, key: TimeKey) -> f64 {
    let Some(series) = &venue.occupancy else {
        return 0.0;
    };
    let value = series.value_at(key);
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 100.0) / 100.0
}

/// Sum weights per cell using the precomputed assignment. O(venues), no
/// spatial search.
pub fn aggregate_counts(
    cells: usize,
    assignment: &Assignment,
    venues: &[Venue],
    key: TimeKey,
) -> Vec<f64> {
    let mut counts = vec![0.0; cells];
    for (venue_index, venue) in venues.iter().enumerate() {
        let weight = occupancy_weight(venue, key);
        if weight > 0.0 {
            counts[assignment.cell_of(venue_index)] += weight;
        }
    }
    counts
}

/// Per-cell output for one time slot, aligned to cell ids.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub counts: Vec<f64>,
    pub index: Vec<f64>,
}

/// Aggregate and normalize one time slot. Plain function so callers can
/// run the pipeline without an engine instance.
pub fn compute_index(
    grid: &Grid,
    assignment: &Assignment,
    venues: &[Venue],
    key: TimeKey,
    normalizer: &dyn Normalizer,
) -> AggregationResult {
    let counts = aggregate_counts(grid.len(), assignment, venues, key);
    let index = normalizer.normalize(&counts);
    AggregationResult { counts, index }
}

/// The deficit-index engine for one dataset: grid geometry, the one-time
/// venue binning, and the per-slot caches. Owned by a single report
/// instance; never shared across instances.
#[derive(Debug)]
pub struct HungerEngine {
    grid: Grid,
    assignment: Assignment,
    venues: Vec<Venue>,
    normalizer: Box<dyn Normalizer>,
    results: TemporalCache<AggregationResult>,
    weights: TemporalCache<Vec<f64>>,
}

impl HungerEngine {
    /// Build from a parsed dataset. `None` when no venue has usable
    /// coordinates: there is nothing to render, which is not an error.
    pub fn build(
        dataset: &Dataset,
        grid_config: &GridConfig,
        normalizer: Box<dyn Normalizer>,
    ) -> Option<Self> {
        let extent = Extent::from_venues(&dataset.venues)?;
        let grid = Grid::build(&extent, grid_config);
        let assignment = Assignment::build(&grid, &dataset.venues);
        Some(Self {
            grid,
            assignment,
            venues: dataset.venues.clone(),
            normalizer,
            results: TemporalCache::new(),
            weights: TemporalCache::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    /// Aggregation + normalization for a slot, cached after first access.
    pub fn index_at(&mut self, key: TimeKey) -> Arc<AggregationResult> {
        let grid = &self.grid;
        let assignment = &self.assignment;
        let venues = &self.venues;
        let normalizer = self.normalizer.as_ref();
        self.results
            .get_or_compute(key, || compute_index(grid, assignment, venues, key, normalizer))
    }

    /// Per-venue weights for a slot (heat/cluster renderers), cached.
    pub fn weights_at(&mut self, key: TimeKey) -> Arc<Vec<f64>> {
        let venues = &self.venues;
        self.weights.get_or_compute(key, || {
            venues
                .iter()
                .map(|venue| occupancy_weight(venue, key))
                .collect()
        })
    }

    /// Clear all cached slots. Call when the dataset or cell size changes;
    /// palette and other visual-only changes must not.
    pub fn invalidate(&mut self) {
        self.results.invalidate();
        self.weights.invalidate();
    }

    /// Cache misses served so far (index results only).
    pub fn computations(&self) -> u64 {
        self.results.computations()
    }
}

/// Recompute one slot and publish it as the current snapshot.
pub fn run_recompute(state: &Arc<RwLock<AppState>>, key: TimeKey) -> Result<(), AppError> {
    let mut guard = state.write().map_err(|_| AppError::StateLock)?;
    let Some(engine) = guard.engine_mut() else {
        // No grid means nothing to render; skip quietly.
        return Ok(());
    };
    let result = engine.index_at(key);
    guard.set_snapshot(IndexSnapshot {
        time_key: key,
        result,
        computed_at: SystemTime::now(),
    })?;
    Ok(())
}

/// Spawn the worker that follows the view through the trailing-edge
/// throttle: slider bursts coalesce, the final position always computes.
pub fn spawn_recompute_thread(
    state: Arc<RwLock<AppState>>,
    window: Duration,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut throttle: TrailingThrottle<TimeKey> = TrailingThrottle::new(window);
        let mut last_seen: Option<TimeKey> = None;

        while !stop.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            let key = match state.read() {
                Ok(guard) => guard.view().time_key(),
                Err(_) => {
                    warn!("State lock poisoned; stopping recompute worker");
                    break;
                }
            };
            if last_seen != Some(key) {
                throttle.submit(key);
                last_seen = Some(key);
            }

            if let Some(due) = throttle.poll(Instant::now())
                && let Err(e) = run_recompute(&state, due)
            {
                warn!("Error recomputing index: {}", e);
            }

            sleep_with_stop(WORKER_POLL_STEP, &stop, cycle_start);
        }
    })
}
