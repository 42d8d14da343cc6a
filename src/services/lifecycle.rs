//! Host lifecycle observers that report foreground/background transitions

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use anyhow::{Context, Result};
use futures::stream::StreamExt;
use signal_hook::{
    consts::{SIGCONT, SIGTSTP},
    low_level::emulate_default_handler,
};
use signal_hook_tokio::Signals;
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, info, warn};

use super::events::{AppStateEvent, HostEvent, HostEventSender};

/// Subscription to the host's background/active notifications
pub trait SuspensionObserver: Send {
    fn subscribe(&mut self) -> Result<()>;
    fn unsubscribe(&mut self);
    fn is_subscribed(&self) -> bool;
}

/// Where the signal task forwards lifecycle events, `None` while unsubscribed
type Route = Arc<Mutex<Option<HostEventSender>>>;

/// Maps job-control signals to lifecycle events.
///
/// `SIGTSTP` (Ctrl-Z) reports `background`. Once the controller has recorded
/// it the default stop action is performed, so the process really suspends.
/// `SIGCONT` (`fg`) reports `active`.
///
/// signal-hook cannot restore a signal's default disposition, so the signal
/// task outlives the subscription: after `unsubscribe` it stops forwarding
/// and only performs the default stop for `SIGTSTP`, keeping Ctrl-Z working.
#[derive(Debug)]
pub struct SignalObserver {
    events_tx: HostEventSender,
    route: Route,
    task: Option<JoinHandle<()>>,
}

impl SignalObserver {
    pub fn new(events_tx: HostEventSender) -> Self {
        Self {
            events_tx,
            route: Arc::new(Mutex::new(None)),
            task: None,
        }
    }

    fn route(&self) -> MutexGuard<'_, Option<HostEventSender>> {
        self.route.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SuspensionObserver for SignalObserver {
    fn subscribe(&mut self) -> Result<()> {
        if self.task.is_none() {
            let signals = Signals::new(&[SIGTSTP, SIGCONT])
                .context("Failed to register lifecycle signal handlers")?;
            self.task = Some(tokio::spawn(forward_lifecycle_signals(
                signals,
                Arc::clone(&self.route),
            )));
        }

        *self.route() = Some(self.events_tx.clone());
        debug!("Subscribed to lifecycle signals");
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.route().take().is_some() {
            debug!("Unsubscribed from lifecycle signals");
        }
    }

    fn is_subscribed(&self) -> bool {
        self.route().is_some()
    }
}

impl Drop for SignalObserver {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn forward_lifecycle_signals(mut signals: Signals, route: Route) {
    while let Some(signal) = signals.next().await {
        let events_tx = route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match (signal, events_tx) {
            (SIGTSTP, Some(events_tx)) => {
                info!("Received SIGTSTP, going to background");
                let (ack_tx, ack_rx) = oneshot::channel();
                let event = HostEvent::AppState {
                    kind: AppStateEvent::Background,
                    ack: Some(ack_tx),
                };

                // Hold the stop until the suspension instant is recorded
                if events_tx.send(event).is_ok() {
                    let _ = ack_rx.await;
                }
                suspend_process();
            }
            (SIGTSTP, None) => {
                debug!("Received SIGTSTP with no subscriber");
                suspend_process();
            }
            (SIGCONT, Some(events_tx)) => {
                info!("Received SIGCONT, back in the foreground");
                let _ = events_tx.send(HostEvent::app_state(AppStateEvent::Active));
            }
            _ => {}
        }
    }
}

fn suspend_process() {
    if let Err(e) = emulate_default_handler(SIGTSTP) {
        warn!("Failed to suspend process: {}", e);
    }
}

/// Observer whose notifications are delivered by calling the controller directly.
///
/// Clones share their flags, so a test can keep a handle to inspect the
/// subscription lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ManualObserver {
    subscribed: Arc<AtomicBool>,
    fail_subscribe: Arc<AtomicBool>,
    unsubscribes: Arc<AtomicUsize>,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// An observer whose registration always fails
    pub fn failing() -> Self {
        let observer = Self::default();
        observer.fail_subscribe.store(true, Ordering::SeqCst);
        observer
    }

    /// Number of times an active subscription was released
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

impl SuspensionObserver for ManualObserver {
    fn subscribe(&mut self) -> Result<()> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            anyhow::bail!("lifecycle notifications unavailable");
        }
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.subscribed.swap(false, Ordering::SeqCst) {
            self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::events::host_event_channel;
    use tokio::time::{timeout, Duration};

    #[test]
    fn test_manual_observer_lifecycle() {
        let handle = ManualObserver::new();
        let mut observer = handle.clone();

        observer.subscribe().unwrap();
        assert!(handle.is_subscribed());

        observer.unsubscribe();
        observer.unsubscribe();
        assert!(!handle.is_subscribed());
        assert_eq!(handle.unsubscribe_count(), 1);
    }

    #[test]
    fn test_failing_manual_observer() {
        let mut observer = ManualObserver::failing();

        let result = observer.subscribe();

        assert!(result.is_err());
        assert!(!observer.is_subscribed());
    }

    #[tokio::test]
    async fn test_signal_observer_reports_sigcont_as_active() {
        let (tx, mut rx) = host_event_channel();
        let mut observer = SignalObserver::new(tx);

        observer.subscribe().unwrap();
        assert!(observer.is_subscribed());

        // SIGCONT to a running process has no side effect besides delivery
        signal_hook::low_level::raise(SIGCONT).unwrap();

        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("Should receive a lifecycle event")
            .expect("Channel should stay open");
        assert!(matches!(
            event,
            HostEvent::AppState { kind: AppStateEvent::Active, ack: None }
        ));

        observer.unsubscribe();
        assert!(!observer.is_subscribed());
    }

    #[tokio::test]
    async fn test_signal_observer_stops_forwarding_after_unsubscribe() {
        let (tx, mut rx) = host_event_channel();
        let mut observer = SignalObserver::new(tx);

        observer.subscribe().unwrap();
        observer.unsubscribe();
        assert!(!observer.is_subscribed());

        signal_hook::low_level::raise(SIGCONT).unwrap();
        let result = timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(result.is_err(), "No event expected after unsubscribe");

        // The signal task is still alive and picks the route up again
        observer.subscribe().unwrap();
        signal_hook::low_level::raise(SIGCONT).unwrap();
        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("Should receive a lifecycle event")
            .expect("Channel should stay open");
        assert!(matches!(
            event,
            HostEvent::AppState { kind: AppStateEvent::Active, .. }
        ));
    }
}
