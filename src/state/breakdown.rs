//! Days/hours/minutes/seconds decomposition of a remaining-seconds value

use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// Display breakdown of a countdown value.
///
/// `hours` wraps at 24 while `days` is uncapped, so 90000 seconds reads as
/// 1 day and 1 hour. Use [`Breakdown::total_hours`] for the unwrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    /// Decompose a whole number of seconds
    pub fn from_seconds(total: u64) -> Self {
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total / SECONDS_PER_HOUR) % 24,
            minutes: (total / SECONDS_PER_MINUTE) % 60,
            seconds: total % 60,
        }
    }

    /// Hours without the 24-hour wrap
    pub fn total_hours(&self) -> u64 {
        self.days * 24 + self.hours
    }

    /// Seconds represented by this breakdown
    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    /// Check if every field is zero
    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}
