//! Route definition file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::routing::{Route, RouteLoader};

/// A watcher that monitors the route definition file for changes.
pub struct RoutesWatcher {
    path: PathBuf,
    loader: RouteLoader,
    update_tx: mpsc::UnboundedSender<Vec<Route>>,
}

impl RoutesWatcher {
    /// Create a new RoutesWatcher.
    ///
    /// Returns the watcher and a receiver for freshly compiled route tables.
    pub fn new(path: &Path, loader: RouteLoader) -> (Self, mpsc::UnboundedReceiver<Vec<Route>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                loader,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let loader = self.loader.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = %path.display(), "Route file change detected, reloading...");
                        match loader.load(&path) {
                            Ok(loaded) => {
                                let _ = tx.send(loaded.routes);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload routes: {}. Keeping current route table.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route watcher started");
        Ok(watcher)
    }
}
