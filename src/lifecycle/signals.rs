//! OS signal handling.
//!
//! - SIGINT/SIGTERM trigger graceful shutdown
//! - SIGHUP triggers a full document reload, not shutdown

use tokio::sync::mpsc;

use crate::lifecycle::{ReloadRequest, Shutdown};

/// Translate OS signals into shutdown and reload events until shutdown.
pub async fn handle_signals(shutdown: Shutdown, reload_tx: mpsc::UnboundedSender<ReloadRequest>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut term, mut hangup) = match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
            (Ok(term), Ok(hangup)) => (term, hangup),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Failed to install signal handlers, falling back to Ctrl+C");
                ctrl_c(&shutdown).await;
                return;
            }
        };

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = term.recv() => break,
                _ = hangup.recv() => {
                    tracing::info!("SIGHUP received, reloading all documents");
                    let _ = reload_tx.send(ReloadRequest);
                }
            }
        }
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    }

    #[cfg(not(unix))]
    {
        let _ = reload_tx;
        ctrl_c(&shutdown).await;
    }
}

async fn ctrl_c(shutdown: &Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}
