//! State management module
//!
//! This module contains the countdown value, its display breakdown and the
//! snapshot published to presenters.

pub mod breakdown;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use breakdown::Breakdown;
pub use snapshot::{TimerPhase, TimerSnapshot};
pub use timer_state::TimerState;
