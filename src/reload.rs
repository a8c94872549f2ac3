//! Reload orchestration: fetch → ingest → build → publish.
//!
//! A reload either publishes a complete new index or leaves the current one
//! in place. Reloads are serialized so a slow fetch can never publish over a
//! newer catalog.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use eir_core::config::SearchConfig;
use eir_core::{ingest, IndexHandle, IngestReport, SearchIndex};
use eir_feeds::{CatalogSource, CatalogWatcher, ConfiguredSource};
use tokio::sync::Mutex;

/// Fetch the catalog from `source` and build an index over it.
pub async fn load_index<S>(
    source: &S,
    config: &SearchConfig,
) -> anyhow::Result<(SearchIndex, IngestReport)>
where
    S: CatalogSource,
{
    let raw = source
        .fetch()
        .await
        .with_context(|| format!("fetching catalog from {}", source.describe()))?;
    let catalog = ingest(&raw);
    let index = SearchIndex::build(catalog.parts, config);
    Ok((index, catalog.report))
}

/// Owns the catalog source and the published index.
#[derive(Debug)]
pub struct Reloader {
    source: ConfiguredSource,
    handle: Arc<IndexHandle>,
    search: SearchConfig,
    gate: Mutex<()>,
}

impl Reloader {
    pub fn new(source: ConfiguredSource, handle: Arc<IndexHandle>, search: SearchConfig) -> Self {
        Self { source, handle, search, gate: Mutex::new(()) }
    }

    pub fn handle(&self) -> &Arc<IndexHandle> {
        &self.handle
    }

    pub fn source(&self) -> &ConfiguredSource {
        &self.source
    }

    /// Refetch and rebuild. On failure the published index is untouched.
    pub async fn reload(&self) -> anyhow::Result<IngestReport> {
        let _gate = self.gate.lock().await;
        let started = Instant::now();

        let (index, report) = match load_index(&self.source, &self.search).await {
            Ok(loaded) => loaded,
            Err(error) => {
                let message = format!("{error:#}");
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %message,
                    "catalog reload failed; keeping the current index"
                );
                return Err(error);
            }
        };

        let records = index.len();
        let previous = self.handle.publish(index);
        tracing::info!(
            source = %self.source.describe(),
            records,
            previous = previous.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog reloaded"
        );
        Ok(report)
    }

    /// Reload every time `watcher` reports a change, until it shuts down.
    pub async fn watch(self: Arc<Self>, mut watcher: CatalogWatcher) {
        while watcher.changed().await.is_some() {
            tracing::info!(path = %watcher.path().display(), "catalog file changed");
            // Failures are already logged; the next change retries.
            let _ = self.reload().await;
        }
        tracing::debug!("catalog watcher stopped");
    }
}
