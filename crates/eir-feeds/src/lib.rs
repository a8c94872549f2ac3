//! eir-feeds: raw catalog sources for eir.
//!
//! Each source fetches the whole catalog document and hands it over as an
//! untyped [`serde_json::Value`]; making sense of it is `eir_core::ingest`'s
//! job. A failed fetch is an error here and never reaches the index.

use std::future::Future;

use eir_core::config::{CatalogConfig, SourceKind};
use serde_json::Value;

pub mod error;
pub mod file;
pub mod http;
pub mod stdin;
pub mod watch;

pub use error::SourceError;
pub use file::FileSource;
pub use http::HttpSource;
pub use stdin::StdinSource;
pub use watch::CatalogWatcher;

/// Trait implemented by each catalog source.
pub trait CatalogSource: Send + Sync {
    /// Human-readable origin for log lines ("file data/parts.json").
    fn describe(&self) -> String;

    /// Fetch the full raw catalog document.
    fn fetch(&self) -> impl Future<Output = Result<Value, SourceError>> + Send;
}

/// Parse a raw catalog document, tolerating a UTF-8 byte-order mark.
pub fn parse_catalog(bytes: &[u8]) -> Result<Value, SourceError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    Ok(serde_json::from_slice(bytes)?)
}

/// The source selected by `[catalog] source`.
#[derive(Debug)]
pub enum ConfiguredSource {
    File(FileSource),
    Http(HttpSource),
    Stdin(StdinSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SourceError> {
        Ok(match config.source {
            SourceKind::File => ConfiguredSource::File(FileSource::new(&config.path)),
            SourceKind::Http => ConfiguredSource::Http(HttpSource::new(&config.url)?),
            SourceKind::Stdin => ConfiguredSource::Stdin(StdinSource::new()),
        })
    }

    /// The file worth watching for changes, if any.
    pub fn watch_path(&self) -> Option<&std::path::Path> {
        match self {
            ConfiguredSource::File(source) => Some(source.path()),
            _ => None,
        }
    }
}

impl CatalogSource for ConfiguredSource {
    fn describe(&self) -> String {
        match self {
            ConfiguredSource::File(source) => source.describe(),
            ConfiguredSource::Http(source) => source.describe(),
            ConfiguredSource::Stdin(source) => source.describe(),
        }
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        match self {
            ConfiguredSource::File(source) => source.fetch().await,
            ConfiguredSource::Http(source) => source.fetch().await,
            ConfiguredSource::Stdin(source) => source.fetch().await,
        }
    }
}
