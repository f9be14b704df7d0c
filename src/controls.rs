//! View state and its event transitions.
//!
//! Every user interaction (sliders, play/pause, animation ticks) is an
//! explicit event applied through a pure transition function; rendering
//! and recomputation observe the resulting state. This keeps UI wiring out
//! of the aggregation core entirely.

use crate::timekey::{MAX_DAY, MAX_HOUR, TimeKey};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 700;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub day: u8,
    pub hour: u8,
    pub playing: bool,
    pub interval_ms: u64,
}

impl ViewState {
    pub fn new(day: u8, hour: u8) -> Self {
        Self {
            day: day.min(MAX_DAY),
            hour: hour.min(MAX_HOUR),
            playing: false,
            interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }

    pub fn time_key(&self) -> TimeKey {
        TimeKey::new(self.day, self.hour)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    SetDay(u8),
    SetHour(u8),
    SetTime { day: u8, hour: u8 },
    Play,
    Pause,
    /// Tick interval in milliseconds; zero is rejected.
    SetSpeed(u64),
    /// Advance one hour, wrapping within the day.
    Tick,
}

/// Pure transition: `(state, event) -> state`. Out-of-range inputs clamp
/// instead of erroring, matching the slider semantics.
pub fn apply(state: ViewState, event: ControlEvent) -> ViewState {
    let mut next = state;
    match event {
        ControlEvent::SetDay(day) => next.day = day.min(MAX_DAY),
        ControlEvent::SetHour(hour) => next.hour = hour.min(MAX_HOUR),
        ControlEvent::SetTime { day, hour } => {
            next.day = day.min(MAX_DAY);
            next.hour = hour.min(MAX_HOUR);
        }
        ControlEvent::Play => next.playing = true,
        ControlEvent::Pause => next.playing = false,
        ControlEvent::SetSpeed(interval_ms) => {
            if interval_ms > 0 {
                next.interval_ms = interval_ms;
            }
        }
        ControlEvent::Tick => next.hour = (next.hour + 1) % 24,
    }
    next
}
