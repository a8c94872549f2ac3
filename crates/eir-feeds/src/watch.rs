//! Catalog file watching.
//!
//! The parent directory is watched rather than the file itself: editors and
//! export scripts usually replace the file by renaming a temporary one over
//! it, which a watch on the old inode would miss. Bursts of events are
//! coalesced into a single change notification.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{recommended_watcher, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::SourceError;

/// Signals changes to one catalog file.
pub struct CatalogWatcher {
    // Dropping the watcher stops the notifications.
    _watcher: RecommendedWatcher,
    changes: mpsc::Receiver<()>,
    debounce: Duration,
    path: PathBuf,
}

impl CatalogWatcher {
    /// Start watching `path`. Must be called inside a tokio runtime.
    pub fn new(path: &Path, debounce: Duration) -> Result<Self, SourceError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name: Option<OsString> = path.file_name().map(OsString::from);

        // Capacity 1: one pending signal is enough, extra events are dropped.
        let (tx, changes) = mpsc::channel(1);
        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event, file_name.as_deref()) => {
                let _ = tx.try_send(());
            }
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "catalog watch error"),
        })
        .map_err(|source| SourceError::Watch { path: path.to_path_buf(), source })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| SourceError::Watch { path: dir.clone(), source })?;

        tracing::info!(path = %path.display(), "watching catalog file");
        Ok(Self {
            _watcher: watcher,
            changes,
            debounce,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next change, then for the file to settle for the
    /// debounce interval. Returns `None` once the watcher has shut down.
    pub async fn changed(&mut self) -> Option<()> {
        self.changes.recv().await?;
        loop {
            tokio::time::sleep(self.debounce).await;
            if self.changes.try_recv().is_err() {
                return Some(());
            }
        }
    }
}

impl std::fmt::Debug for CatalogWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWatcher")
            .field("path", &self.path)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

fn is_relevant(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
        return false;
    }
    match file_name {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => true,
    }
}
