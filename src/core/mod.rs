//! Core module - graph model and persistence

pub mod cache;
pub mod error;
pub mod graph;
pub mod persistence;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::LocalCache;
pub use error::{OperationFailed, StoreError, StoreResult};
pub use graph::{Entity, Graph, Relation, SearchResult};
pub use persistence::{PersistenceManager, RemoteStore};
