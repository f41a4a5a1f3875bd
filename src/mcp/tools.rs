//! MCP Tool argument structs for the knowledge graph
//!
//! Every field is required; a missing or ill-typed field is a request
//! validation failure, reported before the graph is touched.

use serde::{Deserialize, Serialize};

use crate::core::graph::{Entity, Relation};

/// Create multiple new entities in the knowledge graph
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateEntitiesTool {
    pub entities: Vec<EntityInput>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInput {
    pub name: String,
    pub entity_type: String,
    pub observations: Vec<String>,
}

impl From<EntityInput> for Entity {
    fn from(input: EntityInput) -> Self {
        Entity::new(input.name, input.entity_type, input.observations)
    }
}

/// Create multiple new relations between entities
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateRelationsTool {
    pub relations: Vec<RelationInput>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationInput {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

impl From<RelationInput> for Relation {
    fn from(input: RelationInput) -> Self {
        Relation::new(input.from, input.to, input.relation_type)
    }
}

/// Search for nodes in the knowledge graph
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchNodesTool {
    /// Case-insensitive substring
    pub query: String,
}
