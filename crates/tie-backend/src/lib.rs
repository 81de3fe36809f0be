//! tie-backend — lists and launches workloads on a host.
//!
//! The backend is the only source of truth for what is running: nothing is
//! cached between calls. Backends are a closed set chosen at startup from
//! [`BackendConfig`].
//!
//! # Components
//!
//! - **`docker`** — Docker Engine HTTP API, one connection per request
//! - **`memory`** — in-process workloads, for dry runs and tests

pub mod docker;
pub mod error;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tie_core::{BackendConfig, Host, Workload, WorkloadRequest};

pub use docker::DockerBackend;
pub use error::{BackendError, BackendResult};
pub use memory::MemoryBackend;

/// Container runtime operations against a single host.
#[async_trait]
pub trait ExecutionBackend: Send + Sync + std::fmt::Debug {
    /// Every workload currently on `host`, with reserved capacity decoded.
    async fn list_workloads(&self, host: &Host) -> BackendResult<Vec<Workload>>;

    /// Create and start a workload on `host`.
    async fn launch_workload(&self, host: &Host, req: &WorkloadRequest)
    -> BackendResult<Workload>;
}

/// Build the backend selected by the daemon configuration.
pub fn from_config(config: &BackendConfig) -> Arc<dyn ExecutionBackend> {
    match config {
        BackendConfig::Docker {
            default_port,
            request_timeout_secs,
        } => {
            let mut backend = DockerBackend::new(*default_port);
            if let Some(secs) = request_timeout_secs {
                backend = backend.with_timeout(Duration::from_secs(*secs));
            }
            Arc::new(backend)
        }
        BackendConfig::Memory => Arc::new(MemoryBackend::new()),
    }
}
