//! Countdown state machine

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    services::{AppStateEvent, Clock, SuspensionObserver, TickSource},
    state::{Breakdown, TimerPhase, TimerSnapshot, TimerState},
};

/// Callback invoked when the countdown reaches zero
pub type FinishCallback = Box<dyn FnOnce() + Send>;

/// Drives a [`TimerState`] from ticks and host lifecycle notifications.
///
/// The controller owns its tick source and lifecycle subscription: `start`
/// acquires both, the tick source is paused while the host is in the
/// background, reaching zero releases it, and `stop` (or dropping the
/// controller) releases everything. The completion callback is
/// consumed on the one transition into [`TimerPhase::Finished`], so it runs
/// at most once per controller.
pub struct TimerController<T: TickSource, O: SuspensionObserver> {
    state: TimerState,
    phase: TimerPhase,
    ticks: T,
    observer: O,
    clock: Arc<dyn Clock>,
    on_finish: Option<FinishCallback>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl<T: TickSource, O: SuspensionObserver> TimerController<T, O> {
    /// Create an idle controller with `initial_seconds` on the clock.
    ///
    /// Negative values are treated as zero, which finishes on the first tick.
    pub fn new(initial_seconds: i64, ticks: T, observer: O, clock: Arc<dyn Clock>) -> Self {
        let state = TimerState::new(initial_seconds);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(TimerSnapshot::capture(TimerPhase::Idle, &state));

        Self {
            state,
            phase: TimerPhase::Idle,
            ticks,
            observer,
            clock,
            on_finish: None,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Set the callback to run when the countdown reaches zero
    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Current countdown state
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Whole seconds remaining, never negative
    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds()
    }

    /// Display breakdown of the remaining time
    pub fn decompose(&self) -> Breakdown {
        self.state.decompose()
    }

    /// Snapshot of the current phase and state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::capture(self.phase, &self.state)
    }

    /// Watch every state change; the receiver starts at the current snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Start counting down.
    ///
    /// Returns false, changing nothing, unless the controller is idle. A
    /// lifecycle subscription failure is logged and the countdown runs
    /// without suspension compensation.
    pub fn start(&mut self) -> bool {
        if self.phase != TimerPhase::Idle {
            debug!("Ignoring start while {}", self.phase);
            return false;
        }

        if let Err(e) = self.observer.subscribe() {
            error!("Failed to subscribe to lifecycle notifications: {:#}", e);
        }
        self.ticks.start();
        self.phase = TimerPhase::Running;

        info!("Countdown started with {}s remaining", self.state.remaining_seconds());
        self.publish();
        true
    }

    /// Handle one elapsed second
    pub fn tick(&mut self) {
        if self.phase != TimerPhase::Running {
            debug!("Ignoring tick while {}", self.phase);
            return;
        }

        if self.state.tick() {
            self.finish();
        } else {
            debug!("Tick, {}s remaining", self.state.remaining_seconds());
            self.publish();
        }
    }

    /// Handle a foreground/background transition of the host
    pub fn handle_app_state(&mut self, event: AppStateEvent) {
        match (event, self.phase) {
            (AppStateEvent::Background, TimerPhase::Running) => {
                let now = self.clock.now();
                self.state.suspend(now);
                // Resume subtracts the whole gap, so no tick may land for it
                self.ticks.cancel();
                self.phase = TimerPhase::Suspended;

                info!(
                    "Went to background with {}s remaining",
                    self.state.remaining_seconds()
                );
                self.publish();
            }
            (AppStateEvent::Active, TimerPhase::Suspended) => {
                let now = self.clock.now();
                let suspended_at = self.state.suspended_at();
                let Some(elapsed) = self.state.resume(now) else {
                    debug!("Active without a recorded background");
                    return;
                };

                if elapsed.is_zero() && suspended_at.is_some_and(|at| at > now) {
                    warn!("Clock went backwards while in background, ignoring elapsed time");
                }
                info!(
                    "Back in foreground after {:.3}s, {}s remaining",
                    elapsed.as_secs_f64(),
                    self.state.remaining_seconds()
                );

                if self.state.is_expired() {
                    self.finish();
                } else {
                    // Fresh period, so a tick missed while stopped is not replayed
                    self.ticks.start();
                    self.phase = TimerPhase::Running;
                    self.publish();
                }
            }
            (event, phase) => {
                debug!("Ignoring {:?} while {}", event, phase);
            }
        }
    }

    /// Release the tick source and lifecycle subscription.
    ///
    /// Safe to call any number of times and in any phase. A controller that
    /// has not finished moves to [`TimerPhase::Stopped`] and will never
    /// invoke its completion callback.
    pub fn stop(&mut self) {
        self.ticks.cancel();
        self.observer.unsubscribe();

        if self.phase.is_terminal() {
            return;
        }

        self.phase = TimerPhase::Stopped;
        self.on_finish = None;
        info!("Countdown stopped with {}s remaining", self.state.remaining_seconds());
        self.publish();
    }

    fn finish(&mut self) {
        self.state.expire();
        self.ticks.cancel();
        self.phase = TimerPhase::Finished;

        info!("Countdown finished");
        self.publish();

        if let Some(callback) = self.on_finish.take() {
            callback();
        }
    }

    fn publish(&self) {
        if let Err(e) = self.snapshot_tx.send(self.snapshot()) {
            warn!("Failed to send timer snapshot: {}", e);
        }
    }
}

impl<T: TickSource, O: SuspensionObserver> Drop for TimerController<T, O> {
    fn drop(&mut self) {
        self.stop();
    }
}
