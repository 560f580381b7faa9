//! Background reload loop.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::store::ConfigStore;

/// Signal asking for a full reload of every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadRequest;

/// Apply reload requests to the store until shutdown or until every sender
/// is dropped. Failures are logged by the store; the loop keeps going.
pub async fn run_reload_loop(
    store: Arc<ConfigStore>,
    mut requests: mpsc::UnboundedReceiver<ReloadRequest>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            request = requests.recv() => {
                if request.is_none() {
                    break;
                }
            }
        }

        // Bursts of file events collapse into one full reload.
        while requests.try_recv().is_ok() {}

        let _ = store.reload_all().await;
    }
    tracing::debug!("Reload loop stopped");
}
