//! Countdown - a suspension-aware countdown timer
//!
//! This is the main entry point for the countdown application.

use std::sync::Arc;
use tracing::info;

use countdown::{
    config::Config,
    controller::TimerController,
    services::{host_event_channel, IntervalTicker, SignalObserver, SystemClock},
    tasks::{countdown_task, presenter_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, the countdown itself owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting countdown v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: until={}s, json={}", config.until, config.json);

    let (events_tx, events_rx) = host_event_channel();
    let controller = TimerController::new(
        config.until,
        IntervalTicker::new(events_tx.clone()),
        SignalObserver::new(events_tx),
        Arc::new(SystemClock),
    )
    .on_finish(|| info!("Time is up"));

    let presenter = tokio::spawn(presenter_task(
        controller.subscribe(),
        config.show.clone(),
        config.output_format(),
        std::io::stdout(),
    ));

    tokio::select! {
        phase = countdown_task(controller, events_rx) => {
            info!("Countdown ended: {}", phase);
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    // The controller is gone by now, so the presenter prints its last line and exits
    if let Err(e) = presenter.await {
        tracing::error!("Presenter task failed: {}", e);
    }

    info!("Countdown shutdown complete");
    Ok(())
}
