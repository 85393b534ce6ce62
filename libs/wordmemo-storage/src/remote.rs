//! Remote HTTP backend.
//!
//! Talks to a JSON service with three routes:
//! - `POST {endpoint}/save` with `{key, data}`
//! - `GET {endpoint}/load/{key}` answering `{data}`, or 404 when absent
//! - `DELETE {endpoint}/delete/{key}`
//!
//! Each request is bounded by the configured timeout; an expired request is
//! dropped, which cancels it.

use crate::backend::{BackendKind, PersistenceBackend};
use crate::config::RemoteConfig;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    key: &'a str,
    data: &'a Value,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    #[serde(default)]
    data: Option<Value>,
}

pub struct RemoteBackend {
    client: Client,
    endpoint: Option<String>,
    timeout_ms: u64,
}

impl RemoteBackend {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config
                .endpoint
                .as_deref()
                .map(|e| e.trim().trim_end_matches('/').to_string())
                .filter(|e| !e.is_empty()),
            timeout_ms: config.timeout_ms,
        }
    }

    fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| StorageError::Configuration("remote endpoint is not set".to_string()))
    }

    /// `{endpoint}/{route}` with each extra segment percent-encoded.
    fn url(&self, route: &str, key: Option<&str>) -> Result<Url> {
        let endpoint = self.endpoint()?;
        let mut url = Url::parse(&format!("{endpoint}/{route}")).map_err(|e| {
            StorageError::Configuration(format!("invalid remote endpoint {endpoint}: {e}"))
        })?;
        if let Some(key) = key {
            url.path_segments_mut()
                .map_err(|_| {
                    StorageError::Configuration(format!("invalid remote endpoint {endpoint}"))
                })?
                .push(key);
        }
        Ok(url)
    }

    async fn bounded<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(Duration::from_millis(self.timeout_ms), request)
            .await
            .map_err(|_| StorageError::Timeout(self.timeout_ms))?
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(StorageError::Http { status, message })
}

#[async_trait]
impl PersistenceBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    /// Nothing to open. A missing endpoint is reported by each operation.
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        let url = self.url("save", None)?;
        let body = SaveRequest { key, data: value };

        self.bounded(async {
            let resp = self
                .client
                .post(url)
                .json(&body)
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;
            check_status(resp).await?;
            Ok(())
        })
        .await
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let url = self.url("load", Some(key))?;

        self.bounded(async {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let resp = check_status(resp).await?;
            let body = resp
                .bytes()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;
            let parsed: LoadResponse = serde_json::from_slice(&body)?;
            Ok(parsed.data.filter(|data| !data.is_null()))
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let url = self.url("delete", Some(key))?;

        self.bounded(async {
            let resp = self
                .client
                .delete(url)
                .send()
                .await
                .map_err(|e| StorageError::Network(e.to_string()))?;
            check_status(resp).await?;
            Ok(())
        })
        .await
    }
}
