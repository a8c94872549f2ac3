//! Errors raised while fetching a raw catalog.

use std::path::PathBuf;

/// A catalog fetch failed. Callers keep serving the previous index.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read catalog from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("invalid catalog URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("catalog request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("catalog request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("catalog endpoint {url} answered {status}")]
    Status { url: String, status: hyper::StatusCode },

    #[error("failed to read catalog response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: hyper::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
