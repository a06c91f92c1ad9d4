//! OS signal handling.

use crate::lifecycle::shutdown::Shutdown;

/// Trigger graceful drain on Ctrl-C / SIGTERM.
pub async fn watch_signals(shutdown: &Shutdown) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install signal handler");
        return;
    }
    tracing::info!("shutdown signal received, draining");
    shutdown.trigger();
}
