//! Utility functions module
//!
//! This module contains process-level helpers for the binary host.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
