//! Background tasks module
//!
//! This module contains the tasks a host runs alongside the timer: the
//! driver that feeds events into the controller and the presenter that
//! prints its snapshots.

pub mod countdown;
pub mod presenter;

// Re-export main functions
pub use countdown::countdown_task;
pub use presenter::presenter_task;
