//! Per-time-slot memoization.
//!
//! The key space is the 168 weekly slots, so the cache is a flat array
//! with no eviction; entries live until `invalidate` is called on a
//! dataset or grid change. Results are shared out as `Arc`s so revisiting
//! a slot returns the exact same allocation, bit for bit.

use crate::timekey::{TIME_SLOTS, TimeKey};
use std::sync::Arc;

#[derive(Debug)]
pub struct TemporalCache<T> {
    entries: Vec<Option<Arc<T>>>,
    computations: u64,
}

impl<T> TemporalCache<T> {
    pub fn new() -> Self {
        Self {
            entries: (0..TIME_SLOTS).map(|_| None).collect(),
            computations: 0,
        }
    }

    /// Return the cached entry for the slot, computing and storing it on
    /// first access.
    pub fn get_or_compute(&mut self, key: TimeKey, compute: impl FnOnce() -> T) -> Arc<T> {
        let slot = &mut self.entries[key.index()];
        if let Some(entry) = slot {
            return Arc::clone(entry);
        }
        self.computations += 1;
        let entry = Arc::new(compute());
        *slot = Some(Arc::clone(&entry));
        entry
    }

    pub fn get(&self, key: TimeKey) -> Option<Arc<T>> {
        self.entries[key.index()].as_ref().map(Arc::clone)
    }

    /// Drop every entry. The computation counter keeps counting across
    /// invalidations.
    pub fn invalidate(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    /// Number of cache misses served so far; tests use this to prove a
    /// revisited slot does not recompute.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn cached_slots(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

impl<T> Default for TemporalCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
