//! Periodic tick sources

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Duration, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use super::events::{HostEvent, HostEventSender};

/// A cancellable 1 Hz tick source owned by the controller.
///
/// Once `cancel` returns, no further tick may be delivered.
pub trait TickSource: Send {
    fn start(&mut self);
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Tick source backed by `tokio::time::interval`.
///
/// `start` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    events_tx: HostEventSender,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Create a ticker firing once per second
    pub fn new(events_tx: HostEventSender) -> Self {
        Self::with_period(events_tx, Duration::from_secs(1))
    }

    /// Create a ticker with a custom period
    pub fn with_period(events_tx: HostEventSender, period: Duration) -> Self {
        Self {
            period,
            events_tx,
            handle: None,
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) {
        if self.handle.is_some() {
            debug!("Ticker already running");
            return;
        }

        let period = self.period;
        let events_tx = self.events_tx.clone();
        self.handle = Some(tokio::spawn(async move {
            // First tick one full period after start, not immediately
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if events_tx.send(HostEvent::Tick).is_err() {
                    warn!("Tick receiver dropped, stopping ticker");
                    break;
                }
            }
        }));
        debug!("Ticker started with period {:?}", period);
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Ticker cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Tick source that never fires on its own.
///
/// The host delivers ticks by calling the controller directly. Clones share
/// their counters, so a test can keep a handle to inspect the lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: Arc<AtomicBool>,
    starts: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `start` was called
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of times `cancel` stopped an active source
    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.active.store(true, Ordering::SeqCst);
    }

    fn cancel(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
