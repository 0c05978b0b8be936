//! Signal handling for graceful shutdown

use anyhow::Context;
use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for SIGTERM or SIGINT and return the signal received
pub async fn shutdown_signal() -> anyhow::Result<i32> {
    let mut signals = Signals::new([signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT])
        .context("Failed to register signal handlers")?;
    let handle = signals.handle();

    let signal = signals
        .next()
        .await
        .context("Signal stream ended unexpectedly")?;
    info!("Received signal: {}", signal);
    handle.close();
    Ok(signal)
}
