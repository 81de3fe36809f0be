//! Execution backend error types.

use thiserror::Error;

use tie_core::FormatError;

/// A backend operation against a single host failed.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connection to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("request error: {0}")]
    Request(String),

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error("invalid host configuration: {0}")]
    HostConfig(String),

    #[error("host unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Format(#[from] FormatError),
}

pub type BackendResult<T> = Result<T, BackendError>;
