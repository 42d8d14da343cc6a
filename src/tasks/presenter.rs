//! Presenter background task

use std::io::Write;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::{
    display::{render_snapshot, OutputFormat, UnitSelection},
    state::TimerSnapshot,
};

/// Write one line per snapshot change until the timer reaches a terminal phase.
///
/// Returns the writer so callers can inspect what was written.
pub async fn presenter_task<W: Write>(
    mut snapshots: watch::Receiver<TimerSnapshot>,
    units: UnitSelection,
    format: OutputFormat,
    mut out: W,
) -> W {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();

        match render_snapshot(&snapshot, &units, format) {
            Ok(line) => {
                if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
                    error!("Failed to write countdown: {}", e);
                    break;
                }
            }
            Err(e) => error!("Failed to render snapshot: {}", e),
        }

        if snapshot.phase.is_terminal() {
            break;
        }
        if snapshots.changed().await.is_err() {
            debug!("Timer dropped, presenter exiting");
            break;
        }
    }

    out
}
