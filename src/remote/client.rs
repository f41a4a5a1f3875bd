//! Object store HTTP client
//!
//! Reads and writes the graph document at a single fixed key:
//! `<base_url><object_name>`. The base URL is expected to be a bucket prefix
//! such as a pre-authenticated request URL ending in `/o/`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::core::error::{StoreError, StoreResult};
use crate::core::graph::Graph;
use crate::core::persistence::RemoteStore;

/// HTTP client for the graph object
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    client: Client,
    /// `None` when no base URL is configured: every call fails immediately
    object_url: Option<Url>,
}

impl ObjectStoreClient {
    /// Create new client from remote config
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.object_name, config.timeout_secs)
    }

    /// Create new client with explicit parameters. An empty `base_url`
    /// disables remote sync.
    pub fn new(base_url: &str, object_name: &str, timeout_secs: u64) -> Result<Self> {
        let object_url = if base_url.trim().is_empty() {
            None
        } else {
            let raw = format!("{}{}", base_url, object_name);
            Some(Url::parse(&raw).with_context(|| format!("Invalid object URL: {}", raw))?)
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, object_url })
    }

    /// Whether a remote location is configured
    pub fn is_enabled(&self) -> bool {
        self.object_url.is_some()
    }

    pub fn object_url(&self) -> Option<&Url> {
        self.object_url.as_ref()
    }

    /// PUT the whole document. Any 2xx is success.
    pub async fn put(&self, graph: &Graph) -> StoreResult<()> {
        let url = self.object_url.clone().ok_or_else(|| StoreError::RemoteWrite {
            status: None,
            detail: "remote sync disabled (no base URL)".to_string(),
        })?;

        let body = serde_json::to_string_pretty(graph).map_err(|e| StoreError::RemoteWrite {
            status: None,
            detail: format!("Failed to serialize graph: {}", e),
        })?;

        let resp = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::RemoteWrite {
                status: None,
                detail: format!("Upload error: {}", e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Object store upload failed");
            return Err(StoreError::RemoteWrite {
                status: Some(status.as_u16()),
                detail: format!("Upload failed: {}", status),
            });
        }

        info!(
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "Memory synced to object store"
        );
        Ok(())
    }

    /// GET the document. 404 and unparsable JSON both yield an empty graph.
    /// Parsable JSON that is not a graph document is a `RemoteRead` error.
    pub async fn get(&self) -> StoreResult<Graph> {
        let url = self.object_url.clone().ok_or_else(|| StoreError::RemoteRead {
            status: None,
            detail: "remote sync disabled (no base URL)".to_string(),
        })?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::RemoteRead {
                status: None,
                detail: format!("Download error: {}", e),
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            warn!("No memory found in object store, starting fresh");
            return Ok(Graph::empty());
        }

        if status != StatusCode::OK {
            return Err(StoreError::RemoteRead {
                status: Some(status.as_u16()),
                detail: format!("Download failed: {}", status),
            });
        }

        let body = resp.text().await.map_err(|e| StoreError::RemoteRead {
            status: Some(status.as_u16()),
            detail: format!("Failed to read response body: {}", e),
        })?;

        // Only an unparsable body counts as "nothing stored"
        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Invalid JSON from object store, treating as empty");
                return Ok(Graph::empty());
            }
        };

        // Parsable but not a graph: fail so load falls back to the local cache
        let graph: Graph = serde_json::from_value(value).map_err(|e| StoreError::RemoteRead {
            status: Some(status.as_u16()),
            detail: format!("Unexpected document shape: {}", e),
        })?;

        debug!(
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "Memory downloaded from object store"
        );
        Ok(graph)
    }
}

#[async_trait]
impl RemoteStore for ObjectStoreClient {
    async fn put(&self, graph: &Graph) -> StoreResult<()> {
        ObjectStoreClient::put(self, graph).await
    }

    async fn get(&self) -> StoreResult<Graph> {
        ObjectStoreClient::get(self).await
    }
}
