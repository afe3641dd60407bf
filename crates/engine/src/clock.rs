//! Wall-clock access for time-of-day heuristics

use chrono::{DateTime, Local, Timelike, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Local hour of day, `0..=23`
    fn current_hour(&self) -> u8;

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock backed by the host's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u8 {
        Local::now().hour() as u8
    }
}

/// Clock pinned to one hour of the day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    hour: u8,
}

impl FixedClock {
    pub fn at_hour(hour: u8) -> Self {
        Self { hour: hour % 24 }
    }
}

impl Clock for FixedClock {
    fn current_hour(&self) -> u8 {
        self.hour
    }
}
