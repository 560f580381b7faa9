//! Document folder watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::lifecycle::ReloadRequest;
use crate::loaders::local_folder::is_document;

/// Watches a document folder and emits a reload request whenever a document
/// file is created, modified or removed.
pub struct DocumentWatcher {
    path: PathBuf,
    poll_interval: Duration,
    reload_tx: mpsc::UnboundedSender<ReloadRequest>,
}

impl DocumentWatcher {
    pub fn new(path: &Path, poll_interval: Duration, reload_tx: mpsc::UnboundedSender<ReloadRequest>) -> Self {
        Self {
            path: path.to_path_buf(),
            poll_interval,
            reload_tx,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.reload_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_document_change(&event) {
                        tracing::info!(paths = ?event.paths, "Document change detected, reloading...");
                        let _ = tx.send(ReloadRequest);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Document watcher started");
        Ok(watcher)
    }
}

fn is_document_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| is_document(p))
}
