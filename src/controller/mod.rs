//! Timer controller module
//!
//! This module contains the countdown state machine that turns ticks and
//! lifecycle notifications into state changes and a one-shot completion.

pub mod timer_controller;

pub use timer_controller::{FinishCallback, TimerController};
