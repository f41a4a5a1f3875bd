//! MCP Tool handlers
//!
//! Every call is one full cycle: load, apply, save if the graph changed.
//! Nothing is cached between calls.

mod mutations;
mod queries;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::tools::{CreateEntitiesTool, CreateRelationsTool, SearchNodesTool};
use crate::core::error::OperationFailed;
use crate::core::graph::{Entity, Relation};
use crate::core::persistence::PersistenceManager;

pub const CREATE_ENTITIES: &str = "create_entities";
pub const CREATE_RELATIONS: &str = "create_relations";
pub const READ_GRAPH: &str = "read_graph";
pub const SEARCH_NODES: &str = "search_nodes";

/// A validated tool call
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateEntities(Vec<Entity>),
    CreateRelations(Vec<Relation>),
    ReadGraph,
    SearchNodes(String),
}

/// The request itself is wrong; the graph was never loaded
#[derive(Debug, Error)]
pub enum InvalidCall {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid params for {tool}: {reason}")]
    InvalidParams { tool: String, reason: String },
}

impl Operation {
    /// Validate tool name and arguments
    pub fn parse(name: &str, args: &Value) -> Result<Self, InvalidCall> {
        match name {
            CREATE_ENTITIES => {
                let tool: CreateEntitiesTool = parse_args(name, args)?;
                Ok(Operation::CreateEntities(
                    tool.entities.into_iter().map(Entity::from).collect(),
                ))
            }
            CREATE_RELATIONS => {
                let tool: CreateRelationsTool = parse_args(name, args)?;
                Ok(Operation::CreateRelations(
                    tool.relations.into_iter().map(Relation::from).collect(),
                ))
            }
            READ_GRAPH => Ok(Operation::ReadGraph),
            SEARCH_NODES => {
                let tool: SearchNodesTool = parse_args(name, args)?;
                Ok(Operation::SearchNodes(tool.query))
            }
            _ => Err(InvalidCall::UnknownTool(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateEntities(_) => CREATE_ENTITIES,
            Operation::CreateRelations(_) => CREATE_RELATIONS,
            Operation::ReadGraph => READ_GRAPH,
            Operation::SearchNodes(_) => SEARCH_NODES,
        }
    }

    /// Mutating operations end with a save
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::CreateEntities(_) | Operation::CreateRelations(_)
        )
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, args: &Value) -> Result<T, InvalidCall> {
    serde_json::from_value(args.clone()).map_err(|e| InvalidCall::InvalidParams {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Runs operations against the persisted graph
///
/// Mutations hold `write_lock` across their whole load-mutate-save cycle, so
/// two mutations in this process never interleave and lose each other's
/// writes. Other processes writing the same object are not coordinated.
pub struct Dispatcher {
    persistence: PersistenceManager,
    write_lock: Mutex<()>,
}

impl Dispatcher {
    pub fn new(persistence: PersistenceManager) -> Self {
        Self {
            persistence,
            write_lock: Mutex::new(()),
        }
    }

    /// Run one operation and produce its JSON payload
    pub async fn dispatch(&self, operation: Operation) -> Result<Value, OperationFailed> {
        let name = operation.name();
        debug!(operation = name, mutating = operation.is_mutating(), "Dispatching");

        let result = match operation {
            Operation::CreateEntities(entities) => {
                let _guard = self.write_lock.lock().await;
                mutations::create_entities(&self.persistence, entities).await
            }
            Operation::CreateRelations(relations) => {
                let _guard = self.write_lock.lock().await;
                mutations::create_relations(&self.persistence, relations).await
            }
            Operation::ReadGraph => Ok(queries::read_graph(&self.persistence).await),
            Operation::SearchNodes(query) => {
                Ok(queries::search_nodes(&self.persistence, &query).await)
            }
        };

        result.map_err(|cause| {
            error!(operation = name, error = %cause, "Operation failed");
            OperationFailed {
                operation: name.to_string(),
                cause,
            }
        })
    }
}
