//! Mutating tools: `create_entities`, `create_relations`
//!
//! The echo is only returned once the save succeeded.

use serde_json::{json, Value};

use crate::core::error::StoreResult;
use crate::core::graph::{Entity, Relation};
use crate::core::persistence::PersistenceManager;

pub(super) async fn create_entities(
    persistence: &PersistenceManager,
    entities: Vec<Entity>,
) -> StoreResult<Value> {
    let mut graph = persistence.load().await;
    let created = graph.create_entities(entities);
    persistence.save(&graph).await?;
    Ok(json!(created))
}

pub(super) async fn create_relations(
    persistence: &PersistenceManager,
    relations: Vec<Relation>,
) -> StoreResult<Value> {
    let mut graph = persistence.load().await;
    let created = graph.create_relations(relations);
    persistence.save(&graph).await?;
    Ok(json!(created))
}
