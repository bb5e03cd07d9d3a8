use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::Event;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// More changes than this in one debounce window collapse into a single
/// refresh of the watched directory.
pub const FLOOD_THRESHOLD: usize = 100;

/// Watches the directory being browsed (non-recursively) and forwards
/// debounced changes as [`Event::FsChange`].
pub struct DirWatcher {
    watched: Arc<Mutex<PathBuf>>,
    debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl DirWatcher {
    pub fn new(
        dir: &Path,
        debounce: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let watched = Arc::new(Mutex::new(dir.to_path_buf()));
        let shared = Arc::clone(&watched);

        let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let paths: Vec<PathBuf> = events
                        .into_iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .map(|e| e.path)
                        .collect();
                    let Ok(dir) = shared.lock() else {
                        return;
                    };
                    if let Some(batch) = collapse_batch(paths, &dir, FLOOD_THRESHOLD) {
                        let _ = event_tx.send(Event::FsChange(batch));
                    }
                }
                Err(e) => warn!(error = %e, "watcher error"),
            }
        })?;

        debouncer.watcher().watch(dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watching");

        Ok(Self { watched, debouncer })
    }

    /// Directory currently watched.
    pub fn watched(&self) -> PathBuf {
        self.watched
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Move the watch to `dir`. A no-op when it is already watched.
    pub fn retarget(&mut self, dir: &Path) -> notify::Result<()> {
        let old = self.watched();
        if old == dir {
            return Ok(());
        }
        if let Err(e) = self.debouncer.watcher().unwatch(&old) {
            // The old directory may have been removed.
            debug!(dir = %old.display(), error = %e, "unwatch failed");
        }
        // Recorded before watching so a failing directory is only tried once.
        if let Ok(mut watched) = self.watched.lock() {
            *watched = dir.to_path_buf();
        }
        self.debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watch moved");
        Ok(())
    }
}

/// Paths to report for one debounce window, or `None` when there is nothing
/// to report. Floods are reduced to the watched directory itself.
fn collapse_batch(paths: Vec<PathBuf>, dir: &Path, threshold: usize) -> Option<Vec<PathBuf>> {
    if paths.is_empty() {
        None
    } else if paths.len() > threshold {
        debug!(count = paths.len(), "change flood, refreshing whole directory");
        Some(vec![dir.to_path_buf()])
    } else {
        Some(paths)
    }
}
