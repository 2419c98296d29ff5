//! Error types surfaced by the adapter

use crate::models::Style;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error object produced by the host, shaped like `runtime.lastError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The callback style reported a failure through its last-error slot.
    #[error("{0}")]
    LastError(HostError),

    /// The promise style rejected.
    #[error("{0}")]
    Rejected(HostError),

    /// The handle threw before handing back an asynchronous result.
    #[error("{0}")]
    Threw(HostError),

    /// A value the host produced could not be converted.
    #[error("{0}")]
    Convert(HostError),

    #[error("{operation}: completion callback was dropped without being called")]
    Abandoned { operation: String },

    #[error("{operation} is not available in the {style}-style host")]
    Unsupported { operation: String, style: Style },

    #[error("neither a callback-style nor a promise-style host is available")]
    NoHost,

    #[error("{operation}: unexpected result shape: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AdapterError {
    /// The host's own error, for the variants that carry one.
    pub fn host_error(&self) -> Option<&HostError> {
        match self {
            AdapterError::LastError(e)
            | AdapterError::Rejected(e)
            | AdapterError::Threw(e)
            | AdapterError::Convert(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}
