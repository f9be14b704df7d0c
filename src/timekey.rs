//! Discrete time slots for the weekly occupancy series.
//!
//! A `TimeKey` encodes (day-of-week, hour-of-day) as `day * 24 + hour`,
//! day 0 = Sunday. The occupancy series attached to each venue has one
//! value per slot, so the whole key space is 168 entries.

/// Number of distinct time slots in a week (7 days × 24 hours).
pub const TIME_SLOTS: usize = 168;

pub const MAX_DAY: u8 = 6;
pub const MAX_HOUR: u8 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeKey(u16);

impl TimeKey {
    /// Build a key from day/hour, clamping both into range.
    pub fn new(day: u8, hour: u8) -> Self {
        let day = day.min(MAX_DAY) as u16;
        let hour = hour.min(MAX_HOUR) as u16;
        Self(day * 24 + hour)
    }

    /// Build a key from a raw slot index, if it is in range.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < TIME_SLOTS {
            Some(Self(index as u16))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn day(self) -> u8 {
        (self.0 / 24) as u8
    }

    pub fn hour(self) -> u8 {
        (self.0 % 24) as u8
    }
}
