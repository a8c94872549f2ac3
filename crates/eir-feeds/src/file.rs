//! JSON file source: the whole catalog as one JSON array on disk.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{parse_catalog, CatalogSource, SourceError};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "catalog file read");
        parse_catalog(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name":"Sensor"}},{{"name":"Cable"}}]"#).unwrap();
        let value = FileSource::new(file.path()).fetch().await.unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.fetch().await, Err(SourceError::Io { .. })));
    }
}
