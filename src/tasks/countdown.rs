//! Countdown driver background task

use tracing::{info, warn};

use crate::{
    controller::TimerController,
    services::{HostEvent, HostEventReceiver, SuspensionObserver, TickSource},
    state::TimerPhase,
};

/// Start the controller and feed it host events until it reaches a terminal phase.
///
/// Ticks and lifecycle notifications arrive on one channel, so the
/// controller sees them strictly one at a time. When the channel closes the
/// countdown is stopped. Returns the final phase.
pub async fn countdown_task<T, O>(
    mut controller: TimerController<T, O>,
    mut events: HostEventReceiver,
) -> TimerPhase
where
    T: TickSource,
    O: SuspensionObserver,
{
    info!("Starting countdown task");
    controller.start();

    while !controller.phase().is_terminal() {
        match events.recv().await {
            Some(HostEvent::Tick) => controller.tick(),
            Some(HostEvent::AppState { kind, ack }) => {
                controller.handle_app_state(kind);
                if let Some(ack) = ack {
                    // The host may have given up waiting; nothing to do then
                    let _ = ack.send(());
                }
            }
            None => {
                warn!("Host event channel closed, stopping countdown");
                break;
            }
        }
    }

    controller.stop();
    info!("Countdown task finished ({})", controller.phase());
    controller.phase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::{
        sync::oneshot,
        time::{sleep, timeout, Duration},
    };

    use crate::services::{
        host_event_channel, AppStateEvent, IntervalTicker, ManualClock, ManualObserver,
        ManualTicker, SystemClock,
    };

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_completion_on_real_ticks() {
        let (tx, rx) = host_event_channel();
        let (finished, on_finish) = counter();
        let controller = TimerController::new(
            3,
            IntervalTicker::new(tx),
            ManualObserver::new(),
            Arc::new(ManualClock::default()),
        )
        .on_finish(on_finish);
        let snapshots = controller.subscribe();

        let phase = timeout(Duration::from_secs(10), countdown_task(controller, rx))
            .await
            .expect("Countdown should finish");

        assert_eq!(phase, TimerPhase::Finished);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(snapshots.borrow().remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_seconds_finishes_after_first_tick() {
        let (tx, rx) = host_event_channel();
        let (finished, on_finish) = counter();
        let controller = TimerController::new(
            0,
            IntervalTicker::new(tx),
            ManualObserver::new(),
            Arc::new(ManualClock::default()),
        )
        .on_finish(on_finish);

        let started = tokio::time::Instant::now();
        let phase = countdown_task(controller, rx).await;

        assert_eq!(phase, TimerPhase::Finished);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_time_is_subtracted() {
        let (tx, rx) = host_event_channel();
        let clock = ManualClock::default();
        let controller = TimerController::new(
            100,
            IntervalTicker::new(tx.clone()),
            ManualObserver::new(),
            Arc::new(clock.clone()),
        );
        let mut snapshots = controller.subscribe();
        let handle = tokio::spawn(countdown_task(controller, rx));

        // One tick lands at t=1s
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(snapshots.borrow().remaining_seconds, 99);

        let (ack_tx, ack_rx) = oneshot::channel();
        tx.send(HostEvent::AppState {
            kind: AppStateEvent::Background,
            ack: Some(ack_tx),
        })
        .unwrap();
        ack_rx.await.expect("Background should be acknowledged");
        assert_eq!(snapshots.borrow().phase, TimerPhase::Suspended);

        // The tick source is paused while suspended, so nothing counts down
        clock.advance(chrono::Duration::seconds(60));
        sleep(Duration::from_secs(5)).await;
        assert_eq!(snapshots.borrow().remaining_seconds, 99);

        tx.send(HostEvent::app_state(AppStateEvent::Active)).unwrap();
        let remaining = snapshots
            .wait_for(|s| s.phase == TimerPhase::Running)
            .await
            .unwrap()
            .remaining_seconds;
        assert_eq!(remaining, 39);

        handle.abort();
    }

    #[tokio::test]
    async fn test_stalled_runtime_does_not_replay_missed_tick() {
        let (tx, rx) = host_event_channel();
        let controller = TimerController::new(
            20,
            IntervalTicker::new(tx.clone()),
            ManualObserver::new(),
            Arc::new(SystemClock),
        );
        let mut snapshots = controller.subscribe();
        let started = std::time::Instant::now();
        let handle = tokio::spawn(countdown_task(controller, rx));

        sleep(Duration::from_millis(1_500)).await;
        let (ack_tx, ack_rx) = oneshot::channel();
        tx.send(HostEvent::AppState {
            kind: AppStateEvent::Background,
            ack: Some(ack_tx),
        })
        .unwrap();
        ack_rx.await.unwrap();

        // Block the whole runtime the way a stopped process would, letting
        // several tick deadlines pass without any task running
        std::thread::sleep(std::time::Duration::from_secs(3));
        tx.send(HostEvent::app_state(AppStateEvent::Active)).unwrap();
        snapshots
            .wait_for(|s| s.phase == TimerPhase::Running)
            .await
            .unwrap();

        // Give a replayed tick the chance to land; a real one is a full period away
        sleep(Duration::from_millis(300)).await;
        let shown = snapshots.borrow().remaining_seconds;
        let expected = 20.0 - started.elapsed().as_secs_f64();

        assert!(
            shown as f64 >= expected.floor(),
            "expected about {:.2}s remaining, shown {}",
            expected,
            shown
        );

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_past_zero_finishes_task() {
        let (tx, rx) = host_event_channel();
        let clock = ManualClock::default();
        let (finished, on_finish) = counter();
        let controller = TimerController::new(
            30,
            IntervalTicker::new(tx.clone()),
            ManualObserver::new(),
            Arc::new(clock.clone()),
        )
        .on_finish(on_finish);
        let handle = tokio::spawn(countdown_task(controller, rx));

        tx.send(HostEvent::app_state(AppStateEvent::Background)).unwrap();
        clock.advance(chrono::Duration::hours(2));
        tx.send(HostEvent::app_state(AppStateEvent::Active)).unwrap();

        let phase = timeout(Duration::from_millis(100), handle)
            .await
            .expect("Task should end without waiting for ticks")
            .unwrap();
        assert_eq!(phase, TimerPhase::Finished);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_closed_channel_stops_countdown() {
        let (tx, rx) = host_event_channel();
        let ticker = ManualTicker::new();
        let observer = ManualObserver::new();
        let (finished, on_finish) = counter();
        let controller = TimerController::new(
            10,
            ticker.clone(),
            observer.clone(),
            Arc::new(ManualClock::default()),
        )
        .on_finish(on_finish);

        tx.send(HostEvent::Tick).unwrap();
        drop(tx);

        let phase = countdown_task(controller, rx).await;

        assert_eq!(phase, TimerPhase::Stopped);
        assert!(!ticker.is_active());
        assert!(!observer.is_subscribed());
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_aborting_task_releases_resources() {
        let (tx, rx) = host_event_channel();
        let ticker = ManualTicker::new();
        let observer = ManualObserver::new();
        let controller = TimerController::new(
            10,
            ticker.clone(),
            observer.clone(),
            Arc::new(ManualClock::default()),
        );
        let handle = tokio::spawn(countdown_task(controller, rx));

        tokio::task::yield_now().await;
        assert!(ticker.is_active());

        handle.abort();
        let _ = handle.await;

        assert!(!ticker.is_active());
        assert!(!observer.is_subscribed());
        drop(tx);
    }
}
