//! Trailing-edge throttling for view-driven recomputation.
//!
//! A burst of slider events collapses to at most one computation per
//! window; the newest request supersedes any pending one, and the final
//! request is always eventually served. The throttle itself never sleeps:
//! callers feed it timestamps, which keeps the policy testable without
//! timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TrailingThrottle<T> {
    window: Duration,
    last_run: Option<Instant>,
    pending: Option<T>,
}

impl<T> TrailingThrottle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: None,
            pending: None,
        }
    }

    /// Queue a request. A newer submission replaces a pending one; nothing
    /// runs until `poll`.
    pub fn submit(&mut self, value: T) {
        self.pending = Some(value);
    }

    /// Take the pending request if the window since the last run has
    /// elapsed (or nothing ran yet). Marks the run time on success.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        self.pending.as_ref()?;
        if let Some(last) = self.last_run
            && now.duration_since(last) < self.window
        {
            return None;
        }
        self.last_run = Some(now);
        self.pending.take()
    }

    /// Drop the pending request without running it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Sleep in small steps so a stop request interrupts the wait promptly.
/// `start` anchors the wait to the beginning of the caller's cycle.
pub fn sleep_with_stop(duration: Duration, stop: &AtomicBool, start: Instant) {
    let elapsed = start.elapsed();
    if elapsed >= duration {
        return;
    }
    let remaining = duration - elapsed;
    let step = Duration::from_millis(25);
    let mut slept = Duration::ZERO;

    while slept < remaining {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        std::thread::sleep(step.min(remaining - slept));
        slept += step;
    }
}
