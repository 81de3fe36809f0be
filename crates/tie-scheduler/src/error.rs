//! Scheduler error types.

use thiserror::Error;

use tie_backend::BackendError;
use tie_inventory::DiscoveryError;

/// Errors that can occur while resolving, querying, or placing workloads.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("cannot find available host among {candidates} candidates")]
    NoAvailableHost { candidates: usize },

    #[error("host not found: {0}")]
    HostNotFound(String),

    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
