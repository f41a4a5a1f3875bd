//! Persistence manager - remote-first load, remote-then-mirror save
//!
//! # Load order
//! 1. Object store GET, mirrored to the local cache
//! 2. Local cache (if step 1 or its mirror write failed)
//! 3. Empty graph
//!
//! `load` never fails. `save` fails when the remote write fails and then
//! leaves the local cache untouched, so a failed save means the mutation is
//! not recorded anywhere.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use super::cache::LocalCache;
use super::error::StoreResult;
use super::graph::Graph;
use crate::config::Config;
use crate::remote::ObjectStoreClient;

/// Remote source of truth for the graph document
///
/// Implemented by `ObjectStoreClient` (HTTP) and by in-memory fakes in tests
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Write the whole document
    async fn put(&self, graph: &Graph) -> StoreResult<()>;

    /// Read the whole document. "Nothing stored yet" is an empty graph.
    async fn get(&self) -> StoreResult<Graph>;
}

/// Orchestrates the object store and the local cache
pub struct PersistenceManager {
    remote: Box<dyn RemoteStore>,
    cache: LocalCache,
}

impl PersistenceManager {
    pub fn new(remote: Box<dyn RemoteStore>, cache: LocalCache) -> Self {
        Self { remote, cache }
    }

    /// Build the HTTP-backed manager for the configured storage location
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ObjectStoreClient::from_config(&config.remote)?;
        if !client.is_enabled() {
            warn!("No object store base URL configured, using local cache only");
        }
        Ok(Self::new(Box::new(client), LocalCache::new(&config.local.path)))
    }

    /// Materialize the graph: remote, else local cache, else empty
    pub async fn load(&self) -> Graph {
        match self.load_remote().await {
            Ok(graph) => graph,
            Err(e) => {
                warn!(error = %e, "Failed to load from object store, trying local cache");
                match self.cache.read().await {
                    Ok(graph) => {
                        info!(path = %self.cache.path().display(), "Loaded memory from local cache");
                        graph
                    }
                    Err(local) => {
                        warn!(error = %local, "No usable local memory file, starting fresh");
                        Graph::empty()
                    }
                }
            }
        }
    }

    /// A failed mirror write fails the whole remote path as well
    async fn load_remote(&self) -> StoreResult<Graph> {
        let graph = self.remote.get().await?;
        self.cache.write(&graph).await?;
        Ok(graph)
    }

    /// Write to the object store, then mirror locally
    ///
    /// Mirror failure after a successful remote write is logged and ignored.
    pub async fn save(&self, graph: &Graph) -> StoreResult<()> {
        if let Err(e) = self.remote.put(graph).await {
            error!(error = %e, "Failed to save memory");
            return Err(e);
        }

        if let Err(e) = self.cache.write(graph).await {
            warn!(error = %e, "Local mirror write failed after remote save");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::core::graph::{Entity, Relation};
    use crate::core::testing::MemoryRemote;
    use tempfile::tempdir;

    fn sample_graph() -> Graph {
        let mut graph = Graph::empty();
        graph.create_entities(vec![
            Entity::new("A", "t", vec!["o1".to_string()]),
            Entity::new("A", "t", vec![]),
        ]);
        graph.create_relations(vec![Relation::new("A", "missing", "points-at")]);
        graph
    }

    fn manager(remote: &MemoryRemote, cache: LocalCache) -> PersistenceManager {
        PersistenceManager::new(Box::new(remote.clone()), cache)
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let remote = MemoryRemote::default();
        let pm = manager(&remote, LocalCache::new(dir.path().join("m.json")));

        pm.save(&sample_graph()).await.unwrap();
        assert_eq!(pm.load().await, sample_graph());
    }

    #[tokio::test]
    async fn test_load_mirrors_remote_to_cache() {
        let dir = tempdir().unwrap();
        let remote = MemoryRemote::with_graph(sample_graph());
        let cache = LocalCache::new(dir.path().join("sub").join("m.json"));
        let pm = manager(&remote, cache.clone());

        pm.load().await;
        assert_eq!(cache.read().await.unwrap(), sample_graph());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_cache() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("m.json"));
        cache.write(&sample_graph()).await.unwrap();

        let remote = MemoryRemote::unreachable();
        let pm = manager(&remote, cache);

        assert_eq!(pm.load().await, sample_graph());
    }

    #[tokio::test]
    async fn test_load_with_nothing_anywhere_is_empty() {
        let dir = tempdir().unwrap();
        let remote = MemoryRemote::unreachable();
        let pm = manager(&remote, LocalCache::new(dir.path().join("absent.json")));

        assert_eq!(pm.load().await, Graph::empty());
    }

    #[tokio::test]
    async fn test_failed_mirror_on_load_uses_fallback_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        // Remote has data but the mirror cannot be written and there is no
        // readable cache: load degrades all the way to empty.
        let remote = MemoryRemote::with_graph(sample_graph());
        let pm = manager(&remote, LocalCache::new(blocker.join("m.json")));

        assert_eq!(pm.load().await, Graph::empty());
    }

    #[tokio::test]
    async fn test_failed_remote_save_skips_local_write() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("m.json"));
        cache.write(&Graph::empty()).await.unwrap();

        let remote = MemoryRemote::unreachable();
        let pm = manager(&remote, cache.clone());

        let err = pm.save(&sample_graph()).await.unwrap_err();
        assert!(matches!(err, StoreError::RemoteWrite { .. }));
        assert_eq!(cache.read().await.unwrap(), Graph::empty());
    }

    #[tokio::test]
    async fn test_mirror_failure_after_remote_save_is_not_fatal() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let remote = MemoryRemote::default();
        let pm = manager(&remote, LocalCache::new(blocker.join("m.json")));

        pm.save(&sample_graph()).await.unwrap();
        assert_eq!(remote.stored(), Some(sample_graph()));
    }
}
