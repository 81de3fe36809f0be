//! Inventory error types.

use thiserror::Error;

/// The host inventory could not be resolved.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read inventory {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed inventory {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
