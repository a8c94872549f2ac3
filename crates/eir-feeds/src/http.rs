//! HTTP source: a JSON endpoint serving the whole catalog (`GET /api/parts`).
//!
//! Plain `http://` only; put a TLS-terminating proxy in front of remote
//! stores.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{header, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use crate::{parse_catalog, CatalogSource, SourceError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Uri,
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, SourceError> {
        let invalid = |reason: String| SourceError::InvalidUrl { url: url.to_string(), reason };
        let uri = url.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(invalid(format!("unsupported scheme {other:?}"))),
            None => return Err(invalid("missing scheme".to_string())),
        }
        if uri.host().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { url: uri, client, timeout: DEFAULT_TIMEOUT })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Uri {
        &self.url
    }
}

impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        format!("http {}", self.url)
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        let url = self.url.to_string();
        let request = Request::get(self.url.clone())
            .header(header::ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| SourceError::InvalidUrl { url: url.clone(), reason: e.to_string() })?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| SourceError::Timeout {
                url: url.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|source| SourceError::Request { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { url, status });
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|source| SourceError::Body { url: url.clone(), source })?
            .to_bytes();
        tracing::debug!(%url, bytes = body.len(), "catalog response received");
        parse_catalog(&body)
    }
}
