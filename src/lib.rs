//! memsync - knowledge graph memory synced to object storage
//!
//! A small knowledge graph (entities with observations, typed relations)
//! served over MCP. The graph lives as one JSON object in a remote object
//! store; a local JSON file mirrors it and serves as fallback.
//!
//! ## Key Concepts
//!
//! - **Whole-document**: every operation loads the full graph and, if it
//!   mutated it, writes the full graph back
//! - **Remote-first load**: object store, then local cache, then empty graph
//! - **Append-only**: duplicates and dangling relations are valid state
//!
//! ## Limitations
//!
//! Mutations are serialized within one process only. Two processes writing
//! the same object can still overwrite each other's changes.

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
pub mod remote;

pub use config::Config;
pub use crate::core::graph::{Entity, Graph, Relation};
pub use crate::core::persistence::PersistenceManager;
pub use mcp::run_mcp_server;
pub use remote::ObjectStoreClient;
