//! Countdown - a suspension-aware countdown timer
//!
//! This library provides a countdown state machine that ticks once per
//! second, compensates for time spent with the host in the background, and
//! fires a completion callback exactly once. The remaining time is exposed
//! as a days/hours/minutes/seconds breakdown for presenters.

pub mod config;
pub mod controller;
pub mod display;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use controller::TimerController;
pub use services::{AppStateEvent, Clock, HostEvent, SuspensionObserver, TickSource};
pub use state::{Breakdown, TimerPhase, TimerSnapshot, TimerState};
pub use tasks::{countdown_task, presenter_task};
pub use utils::signals::shutdown_signal;
