//! Remote object store module
//!
//! Provides the HTTP client for the single graph object.

mod client;

pub use client::ObjectStoreClient;
