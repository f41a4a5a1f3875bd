//! MCP (Model Context Protocol) Server
//!
//! Exposes the knowledge graph via MCP tools for AI integration.
//!
//! # Tools
//! - `create_entities` - Append entities (no dedup)
//! - `create_relations` - Append relations (no referential checks)
//! - `read_graph` - Return the whole graph
//! - `search_nodes` - Case-insensitive substring search over entities

pub mod handlers;
pub mod jsonrpc;
mod server;
mod tools;

pub use handlers::{Dispatcher, InvalidCall, Operation};
pub use server::{run_mcp_server, serve, MemoryServer};
