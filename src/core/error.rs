//! Error taxonomy for persistence and dispatch
//!
//! A 404 or malformed JSON on remote read is *not* an error: both degrade to
//! an empty graph inside the object store client.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of one of the two storage leaves
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote write failed ({}): {detail}", describe_status(.status))]
    RemoteWrite { status: Option<u16>, detail: String },

    #[error("remote read failed ({}): {detail}", describe_status(.status))]
    RemoteRead { status: Option<u16>, detail: String },

    #[error("local cache write to {} failed: {source}", .path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("local cache read from {} failed: {source}", .path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// HTTP status carried by remote failures, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::RemoteWrite { status, .. } | StoreError::RemoteRead { status, .. } => {
                *status
            }
            _ => None,
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no response".to_string(),
    }
}

/// Dispatcher-level wrapper: the only error a tool caller ever sees
#[derive(Debug, Error)]
#[error("Tool execution failed: {cause}")]
pub struct OperationFailed {
    pub operation: String,
    #[source]
    pub cause: StoreError,
}

pub type StoreResult<T> = Result<T, StoreError>;
