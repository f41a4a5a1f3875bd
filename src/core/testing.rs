//! In-memory `RemoteStore` fake shared by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::graph::Graph;
use super::persistence::RemoteStore;

#[derive(Clone, Default)]
pub struct MemoryRemote {
    object: Arc<Mutex<Option<Graph>>>,
    unreachable: bool,
    /// Artificial latency on GET, to widen read-modify-write windows
    get_delay: Option<Duration>,
    puts: Arc<AtomicUsize>,
}

impl MemoryRemote {
    pub fn with_graph(graph: Graph) -> Self {
        let remote = Self::default();
        *remote.object.lock().unwrap() = Some(graph);
        remote
    }

    /// Every call fails as if the connection was refused
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = Some(delay);
        self
    }

    pub fn stored(&self) -> Option<Graph> {
        self.object.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn put(&self, graph: &Graph) -> StoreResult<()> {
        if self.unreachable {
            return Err(StoreError::RemoteWrite {
                status: None,
                detail: "connection refused".to_string(),
            });
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        *self.object.lock().unwrap() = Some(graph.clone());
        Ok(())
    }

    async fn get(&self) -> StoreResult<Graph> {
        if self.unreachable {
            return Err(StoreError::RemoteRead {
                status: None,
                detail: "connection refused".to_string(),
            });
        }
        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.object.lock().unwrap().clone().unwrap_or_default())
    }
}
