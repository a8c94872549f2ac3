//! Stdin source: a catalog piped into the process.
//!
//! Stdin can only be drained once, so the first successful read is kept and
//! served again on later fetches.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::OnceCell;

use crate::{parse_catalog, CatalogSource, SourceError};

#[derive(Debug, Default)]
pub struct StdinSource {
    document: OnceCell<Value>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogSource for StdinSource {
    fn describe(&self) -> String {
        "stdin".to_string()
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        self.document
            .get_or_try_init(|| read_catalog(tokio::io::stdin()))
            .await
            .cloned()
    }
}

/// Read a reader to EOF and parse it as a catalog document.
pub async fn read_catalog<R>(mut reader: R) -> Result<Value, SourceError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await.map_err(SourceError::Stdin)?;
    parse_catalog(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_until_eof() {
        let input: &[u8] = br#"[{"name":"Sensor"}]"#;
        let value = read_catalog(input).await.unwrap();
        assert_eq!(value[0]["name"], "Sensor");
    }

    #[tokio::test]
    async fn empty_input_is_a_parse_error() {
        let input: &[u8] = b"";
        assert!(matches!(read_catalog(input).await, Err(SourceError::Parse(_))));
    }
}
