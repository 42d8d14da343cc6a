//! Controller phase and the snapshot published to presenters

use serde::{Deserialize, Serialize};

use super::{Breakdown, TimerState};

/// Lifecycle phase of a timer controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Created but not started
    #[default]
    Idle,
    /// Counting down in the foreground
    Running,
    /// Host is in the background, waiting for it to become active again
    Suspended,
    /// Reached zero; terminal
    Finished,
    /// Torn down before reaching zero; terminal
    Stopped,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Suspended => "suspended",
            TimerPhase::Finished => "finished",
            TimerPhase::Stopped => "stopped",
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TimerPhase::Finished | TimerPhase::Stopped)
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a presenter needs to redraw after a state change
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    pub breakdown: Breakdown,
}

impl TimerSnapshot {
    /// Capture the current phase and state
    pub fn capture(phase: TimerPhase, state: &TimerState) -> Self {
        Self {
            phase,
            remaining_seconds: state.remaining_seconds(),
            breakdown: state.decompose(),
        }
    }
}
