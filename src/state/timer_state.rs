//! Timer state structure and management

use std::time::Duration;
use chrono::{DateTime, Utc};

use super::Breakdown;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Countdown value plus the bookkeeping needed to compensate for suspension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Remaining time, kept below whole seconds so resume compensation is exact
    remaining: Duration,
    /// When the host last went to the background, `None` while in the foreground
    suspended_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a timer state with the given number of seconds left.
    ///
    /// Negative values are treated as an already expired timer.
    pub fn new(initial_seconds: i64) -> Self {
        Self {
            remaining: Duration::from_secs(initial_seconds.max(0) as u64),
            suspended_at: None,
        }
    }

    /// Whole seconds remaining, fraction truncated
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining.as_secs()
    }

    /// Remaining time at full precision
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Break the remaining whole seconds into display groups
    pub fn decompose(&self) -> Breakdown {
        Breakdown::from_seconds(self.remaining_seconds())
    }

    /// Check if no time is left
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Instant of the last background transition, if still suspended
    pub fn suspended_at(&self) -> Option<DateTime<Utc>> {
        self.suspended_at
    }

    /// Check if a background transition is pending compensation
    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    /// Count down one second.
    ///
    /// Returns true when this was the last second; the value is then exactly zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining <= ONE_SECOND {
            self.remaining = Duration::ZERO;
            true
        } else {
            self.remaining -= ONE_SECOND;
            false
        }
    }

    /// Record the instant the host went to the background
    pub fn suspend(&mut self, at: DateTime<Utc>) {
        self.suspended_at = Some(at);
    }

    /// Subtract the wall-clock time spent in the background.
    ///
    /// Returns the elapsed time that was subtracted, or `None` when no
    /// background transition was recorded. A clock that went backwards
    /// counts as zero elapsed time so the remaining value never grows.
    pub fn resume(&mut self, at: DateTime<Utc>) -> Option<Duration> {
        let suspended_at = self.suspended_at.take()?;
        let elapsed = (at - suspended_at).to_std().unwrap_or(Duration::ZERO);
        self.remaining = self.remaining.saturating_sub(elapsed);
        Some(elapsed)
    }

    /// Force the value to zero
    pub fn expire(&mut self) {
        self.remaining = Duration::ZERO;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(0)
    }
}
