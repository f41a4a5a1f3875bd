//! Read-only tools: `read_graph`, `search_nodes`

use serde_json::{json, Value};

use crate::core::persistence::PersistenceManager;

pub(super) async fn read_graph(persistence: &PersistenceManager) -> Value {
    json!(persistence.load().await)
}

pub(super) async fn search_nodes(persistence: &PersistenceManager, query: &str) -> Value {
    let graph = persistence.load().await;
    json!(graph.search_nodes(query))
}
