//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::config::loader::load_config;
use crate::config::schema::UtilsConfig;
use crate::config::SharedConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<UtilsConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<UtilsConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            update_tx,
        }, update_rx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let reload_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    reload(&reload_path, &update_tx);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Re-read `path` and hand the result to the update channel.
///
/// Invalid files are skipped; the current configuration stays in place.
fn reload(path: &Path, updates: &mpsc::UnboundedSender<UtilsConfig>) {
    tracing::info!(path = ?path, "Config file change detected, reloading");

    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            return;
        }
    };

    if let Err(e) = updates.send(config) {
        tracing::warn!(error = %e, "Config update receiver closed, reload dropped");
    }
}

/// Publish every received configuration into the shared handle.
///
/// Runs until all senders are dropped.
pub async fn apply_updates(
    shared: SharedConfig,
    mut updates: mpsc::UnboundedReceiver<UtilsConfig>,
) {
    while let Some(config) = updates.recv().await {
        tracing::info!(
            locales = config.i18n.locales.len(),
            default_locale = %config.i18n.default_locale,
            "Applying reloaded configuration"
        );
        shared.store(Arc::new(config));
    }
}
