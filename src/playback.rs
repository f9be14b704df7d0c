//! Animation ticker.
//!
//! One dedicated thread owns the timer; while the view says `playing` it
//! applies a `Tick` event per interval, advancing the hour within the day.
//! Pausing stops ticking without killing the thread, and there is never
//! more than one timer in flight per state instance.

use crate::controls::ControlEvent;
use crate::state::AppState;
use crate::throttle::sleep_with_stop;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::warn;

pub fn spawn_playback_thread(
    state: Arc<RwLock<AppState>>,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            let view = match state.read() {
                Ok(guard) => guard.view(),
                Err(_) => {
                    warn!("State lock poisoned; stopping playback ticker");
                    break;
                }
            };

            if view.playing {
                match state.write() {
                    Ok(mut guard) => {
                        if let Err(e) = guard.apply_control(ControlEvent::Tick) {
                            warn!("Error applying playback tick: {}", e);
                        }
                    }
                    Err(_) => {
                        warn!("State lock poisoned; stopping playback ticker");
                        break;
                    }
                }
            }

            // Speed changes take effect on the next cycle.
            sleep_with_stop(Duration::from_millis(view.interval_ms), &stop, cycle_start);
        }
    })
}
