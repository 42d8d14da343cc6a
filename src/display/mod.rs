//! Presentation of countdown snapshots
//!
//! This module turns a [`Breakdown`] into the digit groups a user sees.
//! It is a pure function of the snapshot and holds no timer state.

pub mod units;

use crate::state::{Breakdown, TimerSnapshot};

pub use units::{TimeUnit, UnitSelection};

/// How snapshots are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Zero-padded digit groups with labels
    #[default]
    Digits,
    /// One JSON object per line
    Json,
}

/// Value shown for one group
pub fn group_value(breakdown: &Breakdown, unit: TimeUnit) -> u64 {
    match unit {
        TimeUnit::Days => breakdown.days,
        TimeUnit::Hours => breakdown.hours,
        TimeUnit::Minutes => breakdown.minutes,
        TimeUnit::Seconds => breakdown.seconds,
    }
}

/// Render the selected groups, e.g. `01 HOURS  01 MINS  01 SECS`
pub fn render(breakdown: &Breakdown, units: &UnitSelection) -> String {
    units
        .iter()
        .map(|unit| format!("{:02} {}", group_value(breakdown, unit), unit.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render a snapshot line in the requested format
pub fn render_snapshot(
    snapshot: &TimerSnapshot,
    units: &UnitSelection,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Digits => Ok(render(&snapshot.breakdown, units)),
        OutputFormat::Json => serde_json::to_string(snapshot),
    }
}
