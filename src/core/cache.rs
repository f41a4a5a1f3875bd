//! Local cache - single JSON file mirror of the last known graph
//!
//! Used as the fallback when the object store cannot be read.

use std::path::{Path, PathBuf};

use super::error::{StoreError, StoreResult};
use super::graph::Graph;

/// JSON file on local disk holding the mirrored graph
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the graph as pretty JSON, creating parent directories as needed
    pub async fn write(&self, graph: &Graph) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(graph).map_err(|e| self.write_error(e.into()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.write_error(e))?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.write_error(e))
    }

    /// Read and parse the file. Missing or unparsable both fail.
    pub async fn read(&self) -> StoreResult<Graph> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;

        serde_json::from_str(&content).map_err(|e| self.read_error(e.into()))
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::LocalWrite {
            path: self.path.clone(),
            source,
        }
    }

    fn read_error(&self, source: std::io::Error) -> StoreError {
        StoreError::LocalRead {
            path: self.path.clone(),
            source,
        }
    }
}
