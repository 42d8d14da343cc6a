//! Signal handling for graceful shutdown

use anyhow::{Context, Result};
use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() -> Result<()> {
    let mut signals = Signals::new(&[
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .context("Failed to create signal handler")?;

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
    Ok(())
}
